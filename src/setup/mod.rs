//! The setup command: resolve the configuration file and register the listener.

mod listener;
mod patch;

pub use listener::{FIXTURE_INJECTOR, ListenerDeclaration};
pub use patch::{
    PatchOptions, PatchOutcome, PatchReport, RELATED_SECTIONS, patch, patch_source, plan,
};

use tracing::debug;

use crate::domain::{Arguments, ConfigError, ProjectLayout, TargetReference};

/// Sink for user-facing output.
pub trait Reporter {
    /// Called with an informational line.
    fn info(&mut self, line: &str);
    /// Called with an error message.
    fn error(&mut self, line: &str);
}

/// A reporter that discards everything.
#[derive(Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn info(&mut self, _line: &str) {}
    fn error(&mut self, _line: &str) {}
}

/// A reporter that keeps every line in memory.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub info: Vec<String>,
    pub errors: Vec<String>,
}

impl Reporter for CollectingReporter {
    fn info(&mut self, line: &str) {
        self.info.push(line.to_string());
    }

    fn error(&mut self, line: &str) {
        self.errors.push(line.to_string());
    }
}

/// Resolves the target from `args` and patches it with the fixture listener.
pub fn run(
    args: &dyn Arguments,
    layout: &ProjectLayout,
    options: PatchOptions,
    reporter: &mut dyn Reporter,
) -> Result<PatchReport, ConfigError> {
    let target = TargetReference::from_arguments(args)?;
    let path = target.resolve(layout)?;
    debug!(?target, path = %path.display(), "resolved configuration file");
    patch(&path, &FIXTURE_INJECTOR, options, reporter)
}

/// Runs the setup command and maps the result to a process exit code.
///
/// Failures are reported through `reporter`; success yields `0`.
pub fn execute(
    args: &dyn Arguments,
    layout: &ProjectLayout,
    options: PatchOptions,
    reporter: &mut dyn Reporter,
) -> (u8, Option<PatchReport>) {
    match run(args, layout, options, reporter) {
        Ok(report) => (0, Some(report)),
        Err(err) => {
            reporter.error(&err.to_string());
            (err.exit_code(), None)
        }
    }
}
