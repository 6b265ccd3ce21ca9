pub(crate) mod config;
pub(crate) mod encode;
pub(crate) mod generator;
