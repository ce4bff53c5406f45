//! Where configuration files live inside a project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Filename of the test-runner configuration patched by default.
pub const DEFAULT_CONFIG_FILE: &str = "phpunit.xml.dist";

/// Directory, relative to the project root, that holds plugins.
pub const DEFAULT_PLUGINS_DIR: &str = "plugins";

/// The project's root-directory knowledge.
///
/// Maps the project root and plugin names to directories. Plugin roots
/// come from explicit entries first, then from `<root>/<plugins_dir>/<name>`.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    plugins_dir: PathBuf,
    plugins: BTreeMap<String, PathBuf>,
    config_file: String,
}

impl ProjectLayout {
    /// Creates a layout rooted at `root` with default conventions.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            plugins_dir: PathBuf::from(DEFAULT_PLUGINS_DIR),
            plugins: BTreeMap::new(),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }

    /// Overrides the directory plugins are looked up in.
    pub fn with_plugins_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugins_dir = dir.into();
        self
    }

    /// Registers an explicit root for a plugin.
    ///
    /// Relative paths are taken from the project root.
    pub fn with_plugin(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        self.plugins.insert(name.into(), root.into());
        self
    }

    /// Overrides the configuration filename.
    pub fn with_config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Returns the root directory of a plugin, if it exists on disk.
    pub fn plugin_root(&self, name: &str) -> Option<PathBuf> {
        let candidate = match self.plugins.get(name) {
            Some(path) => self.root.join(path),
            None => self.root.join(&self.plugins_dir).join(name),
        };
        candidate.is_dir().then_some(candidate)
    }
}
