pub(crate) mod builder;
pub(crate) mod descriptor;
