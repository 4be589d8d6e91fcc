pub(crate) mod annotation;
