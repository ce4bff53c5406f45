//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::{Arguments, FILE_OPTION, PLUGIN_OPTION};
use output::OutputFormat;

/// fixture-setup - register the fixture listener in a test-runner configuration
#[derive(Parser, Debug)]
#[command(name = "fixture-setup", version, about, long_about = None)]
pub struct Cli {
    /// Project root directory (defaults to the current directory)
    #[arg(short = 'r', long, global = true)]
    pub root: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add the fixture listener to phpunit.xml.dist
    Setup(SetupArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `setup` command
#[derive(Parser, Debug, Default)]
pub struct SetupArgs {
    /// Configuration file to patch, relative to the project root
    #[arg(long)]
    pub file: Option<String>,

    /// Patch the configuration file of this plugin instead
    #[arg(long)]
    pub plugin: Option<String>,

    /// Show what would change without writing the file
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

impl Arguments for SetupArgs {
    fn option(&self, name: &str) -> Option<&str> {
        match name {
            FILE_OPTION => self.file.as_deref(),
            PLUGIN_OPTION => self.plugin.as_deref(),
            _ => None,
        }
    }
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}
