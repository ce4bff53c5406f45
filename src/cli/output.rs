//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::setup::{PatchOutcome, PatchReport};

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Serializable summary of a setup run.
#[derive(Debug, Serialize)]
pub struct SetupListing {
    pub path: String,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    pub written: bool,
}

impl From<&PatchReport> for SetupListing {
    fn from(report: &PatchReport) -> Self {
        let removed = match report.outcome {
            PatchOutcome::Replaced { removed } => Some(removed),
            _ => None,
        };
        Self {
            path: report.path.display().to_string(),
            outcome: report.outcome.label(),
            removed,
            written: report.written,
        }
    }
}
