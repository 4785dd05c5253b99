#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod form;
pub mod plugin;

pub use plugin::{PLUGIN_DEFINITION, PluginDefinition, SermepaConfiguration};
