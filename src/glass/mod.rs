pub(crate) mod bezier;
pub(crate) mod displacement;
pub(crate) mod generate;
pub(crate) mod sdf;
