//! Fluent wrapper around assert_cmd::Command.

// Allow dead code since this is a test utility with methods for future tests
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Fluent wrapper around `assert_cmd::Command` for the `fixture-setup` binary.
///
/// Provides a builder-style API for constructing and executing CLI commands.
pub struct SetupCommand {
    args: Vec<String>,
}

impl SetupCommand {
    /// Creates a new command for the `fixture-setup` binary.
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Sets the `--root` option to specify the project root.
    pub fn root(mut self, path: &Path) -> Self {
        self.args.push("--root".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    /// Adds arguments to the command.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Returns the current arguments (for testing).
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command and returns an Assert for making assertions.
    #[allow(deprecated)]
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd =
            Command::cargo_bin("fixture-setup").expect("Failed to find fixture-setup binary");
        cmd.env_remove("RUST_LOG");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    /// Configures for the `setup` command.
    pub fn setup(self) -> Self {
        self.args(["setup"])
    }

    /// Adds `--file <name>`.
    pub fn file(self, name: &str) -> Self {
        self.args(["--file", name])
    }

    /// Adds `--plugin <name>`.
    pub fn plugin(self, name: &str) -> Self {
        self.args(["--plugin", name])
    }

    /// Adds `--dry-run`.
    pub fn dry_run(self) -> Self {
        self.args(["--dry-run"])
    }

    // ===========================================
    // Format Options
    // ===========================================

    /// Adds `--format json` to the command.
    pub fn format_json(self) -> Self {
        self.args(["--format", "json"])
    }
}

impl Default for SetupCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_runs_binary() {
        SetupCommand::new().args(["--help"]).assert().success();
    }

    #[test]
    fn test_command_with_root() {
        let temp = TempDir::new().unwrap();
        let cmd = SetupCommand::new().root(temp.path());
        let args = cmd.get_args();
        assert_eq!(args[0], "--root");
        assert_eq!(args[1], temp.path().to_string_lossy());
    }

    #[test]
    fn test_command_output_success() {
        let output = SetupCommand::new().args(["--help"]).output_success();
        assert!(output.contains("setup"));
    }

    #[test]
    fn test_command_shortcuts() {
        let cmd = SetupCommand::new().setup().file("phpunit.xml").format_json();
        let args = cmd.get_args();
        assert_eq!(args, ["setup", "--file", "phpunit.xml", "--format", "json"]);
    }
}
