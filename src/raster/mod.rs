pub(crate) mod composite;
pub(crate) mod sample;
pub(crate) mod smooth;
pub(crate) mod stroke;
