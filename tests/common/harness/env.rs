//! Isolated test environment with a temporary project directory.

// Allow dead code since not every test binary uses every helper
#![allow(dead_code)]

use super::SetupCommand;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary project root.
///
/// Creates a temp directory that is automatically cleaned up on drop.
/// Provides methods for writing configuration files and plugins.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    _temp_dir: TempDir,
    /// Path to the project root
    root: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment with an empty project root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Returns the path to the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the default configuration file.
    pub fn default_config_path(&self) -> PathBuf {
        self.root.join("phpunit.xml.dist")
    }

    /// Writes a file relative to the project root and returns its path.
    ///
    /// Parent directories are created as needed.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Copies a fixture into the project root under `name`.
    pub fn copy_fixture(&self, fixture: &Path, name: &str) -> PathBuf {
        let content = crate::common::read_fixture(fixture);
        self.write_file(name, &content)
    }

    /// Creates `plugins/<name>/phpunit.xml.dist` and returns its path.
    pub fn add_plugin(&self, name: &str, content: &str) -> PathBuf {
        self.write_file(&format!("plugins/{name}/phpunit.xml.dist"), content)
    }

    /// Reads a file relative to the project root.
    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.root.join(name)).expect("Failed to read file")
    }

    /// Creates a SetupCommand configured for this test environment.
    pub fn cmd(&self) -> SetupCommand {
        SetupCommand::new().root(&self.root).setup()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.root().is_dir(), "project root should be a directory");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.root().to_path_buf()
        };
        assert!(
            !path.exists(),
            "temp directory should be cleaned up on drop"
        );
    }

    #[test]
    fn test_env_add_plugin_creates_nested_file() {
        let env = TestEnv::new();
        let path = env.add_plugin("Blog", "<phpunit/>");
        assert!(path.ends_with("plugins/Blog/phpunit.xml.dist"));
        assert_eq!(env.read("plugins/Blog/phpunit.xml.dist"), "<phpunit/>");
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--root");
        assert_eq!(args[1], env.root().to_string_lossy());
        assert_eq!(args[2], "setup");
    }
}
