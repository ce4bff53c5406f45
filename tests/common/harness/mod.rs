//! Test harness for CLI integration tests.
//!
//! Provides isolated project directories, plugin scaffolding, and CLI
//! assertion helpers using `assert_cmd`.

mod command;
mod env;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::SetupCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
