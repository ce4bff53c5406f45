//! Setup command handler.

use std::process::ExitCode;

use anyhow::{Context, Result};

use super::ConsoleReporter;
use crate::cli::SetupArgs;
use crate::cli::output::{OutputFormat, SetupListing};
use crate::domain::ProjectLayout;
use crate::setup::{PatchOptions, Reporter, execute};

pub fn handle_setup(args: &SetupArgs, layout: &ProjectLayout) -> Result<ExitCode> {
    let mut reporter = ConsoleReporter::new(args.format == OutputFormat::Json);
    let (code, json) = handle_setup_impl(args, layout, &mut reporter)?;
    if let Some(json) = json {
        println!("{json}");
    }
    Ok(ExitCode::from(code))
}

/// Internal implementation that accepts any reporter.
///
/// Returns the exit code and, for `--format json`, the serialized report.
pub(crate) fn handle_setup_impl<R: Reporter>(
    args: &SetupArgs,
    layout: &ProjectLayout,
    reporter: &mut R,
) -> Result<(u8, Option<String>)> {
    let options = PatchOptions {
        dry_run: args.dry_run,
    };

    let (code, report) = execute(args, layout, options, reporter);

    let json = match (&report, args.format) {
        (Some(report), OutputFormat::Json) => Some(
            serde_json::to_string_pretty(&SetupListing::from(report))
                .context("failed to serialize setup report")?,
        ),
        _ => None,
    };

    Ok((code, json))
}
