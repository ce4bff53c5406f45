//! Failure taxonomy for resolving and patching a test-runner configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the setup command.
///
/// Every variant is terminal: the command reports it and exits without
/// retrying. Each one carries enough context to tell the user what to fix.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--file ({file}) and --plugin ({plugin}) are mutually exclusive; pass only one")]
    ConflictingArguments { file: String, plugin: String },

    #[error("plugin not found: {name}")]
    UnknownPlugin { name: String },

    #[error("configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed XML in {path}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConfigError {
    /// Process exit code for this failure.
    ///
    /// Argument misuse gets the conventional usage code `2`; every other
    /// failure exits with `1`.
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::ConflictingArguments { .. } => 2,
            _ => 1,
        }
    }
}
