//! Core types: target references, project layout, error taxonomy

mod error;
mod layout;
mod target;

pub use error::ConfigError;
pub use layout::{DEFAULT_CONFIG_FILE, DEFAULT_PLUGINS_DIR, ProjectLayout};
pub use target::{Arguments, FILE_OPTION, PLUGIN_OPTION, TargetReference, resolve};
