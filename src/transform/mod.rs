pub(crate) mod blend;
pub(crate) mod builder;
pub(crate) mod mesh_transform;
pub(crate) mod policy;
pub(crate) mod query;
pub(crate) mod shared;
