//! Choosing which configuration file to patch.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::error::ConfigError;
use super::layout::ProjectLayout;

/// Name of the flag holding an explicit configuration path.
pub const FILE_OPTION: &str = "file";

/// Name of the flag holding a plugin name.
pub const PLUGIN_OPTION: &str = "plugin";

/// Read access to named command-line flags.
pub trait Arguments {
    /// Returns the value of a flag, or `None` when it was not passed.
    fn option(&self, name: &str) -> Option<&str>;
}

impl<'a> Arguments for BTreeMap<&'a str, &'a str> {
    fn option(&self, name: &str) -> Option<&str> {
        self.get(name).copied()
    }
}

/// Which configuration file the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetReference {
    /// A path relative to the project root.
    File(PathBuf),
    /// The configuration file of an installed plugin.
    Plugin(String),
    /// The project's own configuration file.
    Default,
}

impl TargetReference {
    /// Builds a reference from the raw flag values.
    ///
    /// Blank values count as absent. Passing both is an error rather than a
    /// silent preference for either.
    pub fn from_options(file: Option<&str>, plugin: Option<&str>) -> Result<Self, ConfigError> {
        let file = file.filter(|f| !f.trim().is_empty());
        let plugin = plugin.filter(|p| !p.trim().is_empty());

        match (file, plugin) {
            (Some(file), Some(plugin)) => Err(ConfigError::ConflictingArguments {
                file: file.to_string(),
                plugin: plugin.to_string(),
            }),
            (Some(file), None) => Ok(TargetReference::File(PathBuf::from(file))),
            (None, Some(plugin)) => Ok(TargetReference::Plugin(plugin.to_string())),
            (None, None) => Ok(TargetReference::Default),
        }
    }

    /// Builds a reference from the `file` and `plugin` flags.
    pub fn from_arguments(args: &dyn Arguments) -> Result<Self, ConfigError> {
        Self::from_options(args.option(FILE_OPTION), args.option(PLUGIN_OPTION))
    }

    /// Turns the reference into a candidate path.
    ///
    /// The returned path is not checked for existence.
    pub fn resolve(&self, layout: &ProjectLayout) -> Result<PathBuf, ConfigError> {
        match self {
            TargetReference::File(file) => Ok(layout.root().join(file)),
            TargetReference::Plugin(name) => layout
                .plugin_root(name)
                .map(|root| root.join(layout.config_file()))
                .ok_or_else(|| ConfigError::UnknownPlugin { name: name.clone() }),
            TargetReference::Default => Ok(layout.root().join(layout.config_file())),
        }
    }
}

/// Resolves the configuration path from optional `file` and `plugin` values.
pub fn resolve(
    file: Option<&str>,
    plugin: Option<&str>,
    layout: &ProjectLayout,
) -> Result<PathBuf, ConfigError> {
    TargetReference::from_options(file, plugin)?.resolve(layout)
}
