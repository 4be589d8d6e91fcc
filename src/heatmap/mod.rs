pub(crate) mod field;
pub(crate) mod ramp;
pub(crate) mod render;
pub(crate) mod settings;
