pub(crate) mod fonts;
pub(crate) mod render;
pub(crate) mod text;
