//! fixture-setup - register the fixture listener in a PHPUnit configuration

pub mod cli;
pub mod domain;
pub mod infra;
pub mod setup;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_completions, handle_setup},
    logging::init_tracing,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    let root = Config::project_root(cli.root.as_ref());

    match &cli.command {
        Command::Setup(args) => {
            let config = Config::load(&root)?;
            handle_setup(args, &config.layout(&root))
        }
        Command::Completions(args) => {
            handle_completions(args);
            Ok(ExitCode::SUCCESS)
        }
    }
}
