//! CLI command implementations.

pub(crate) mod extensions;
pub(crate) mod render;

pub(crate) use extensions::ExtensionsArgs;
pub(crate) use render::RenderArgs;
