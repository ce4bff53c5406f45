//! Project configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::ProjectLayout;

/// Project configuration loaded from `fixture-setup.toml` in the project root.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Configuration filename to patch instead of `phpunit.xml.dist`
    pub config_file: Option<String>,

    /// Directory holding plugins, relative to the project root
    pub plugins_dir: Option<PathBuf>,

    /// Explicit plugin roots by plugin name
    #[serde(default)]
    pub plugins: BTreeMap<String, PathBuf>,
}

impl Config {
    pub const FILE_NAME: &'static str = "fixture-setup.toml";

    /// Load configuration from the project root.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load(root: &Path) -> Result<Self> {
        let config_path = Self::config_path(root);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file for a project root.
    pub fn config_path(root: &Path) -> PathBuf {
        root.join(Self::FILE_NAME)
    }

    /// Resolve the project root, with CLI argument taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--root` argument
    /// 2. Current working directory
    pub fn project_root(cli_root: Option<&PathBuf>) -> PathBuf {
        cli_root.cloned().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Builds the project layout rooted at `root`.
    pub fn layout(&self, root: &Path) -> ProjectLayout {
        let mut layout = ProjectLayout::new(root);
        if let Some(dir) = &self.plugins_dir {
            layout = layout.with_plugins_dir(dir);
        }
        if let Some(name) = &self.config_file {
            layout = layout.with_config_file(name);
        }
        for (name, path) in &self.plugins {
            layout = layout.with_plugin(name, path);
        }
        layout
    }
}
