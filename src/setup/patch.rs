//! Ensuring a test-runner configuration registers the fixture listener.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Reporter;
use super::listener::{LISTENER_ELEMENT, LISTENERS_SECTION, ListenerDeclaration};
use crate::domain::ConfigError;
use crate::infra::{
    Edits, Element, FsError, XmlDocument, indent_lines, line_range, read_text, write_text,
};

/// Root sections a new `<listeners>` section is placed after, when present.
pub const RELATED_SECTIONS: &[&str] = &[
    "php",
    "testsuites",
    "groups",
    "filter",
    "coverage",
    "source",
    "extensions",
];

/// What the patcher did to the listener section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The section already held exactly the canonical entry.
    Unchanged,
    /// The section was empty and the entry was added to it.
    Appended,
    /// Existing entries were swapped for the canonical one.
    Replaced { removed: usize },
    /// There was no section; one was created holding the entry.
    SectionCreated,
}

impl PatchOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, PatchOutcome::Unchanged)
    }

    /// Short machine-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            PatchOutcome::Unchanged => "unchanged",
            PatchOutcome::Appended => "appended",
            PatchOutcome::Replaced { .. } => "replaced",
            PatchOutcome::SectionCreated => "section_created",
        }
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Unchanged => write!(f, "listener already registered"),
            PatchOutcome::Appended => write!(f, "listener added"),
            PatchOutcome::Replaced { removed: 1 } => write!(f, "replaced 1 listener entry"),
            PatchOutcome::Replaced { removed } => write!(f, "replaced {removed} listener entries"),
            PatchOutcome::SectionCreated => write!(f, "created <{LISTENERS_SECTION}> section"),
        }
    }
}

/// Switches for a patch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Compute the outcome without writing the file.
    pub dry_run: bool,
}

/// Result of a successful patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub outcome: PatchOutcome,
    pub written: bool,
}

/// Patches the file at `path` so it registers `listener`.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` when `path` is not a regular file,
/// `ConfigError::MalformedDocument` when it is not well-formed XML, and
/// `ConfigError::WriteFailed` when the result cannot be saved.
pub fn patch(
    path: &Path,
    listener: &ListenerDeclaration,
    options: PatchOptions,
    reporter: &mut dyn Reporter,
) -> Result<PatchReport, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound { path: path.into() });
    }

    let file = read_text(path).map_err(|e| match e {
        FsError::NotFound { path } => ConfigError::FileNotFound { path },
        FsError::InvalidEncoding { path, encoding } => ConfigError::MalformedDocument {
            path,
            reason: encoding,
        },
        FsError::Io { path, source } | FsError::AtomicWrite { path, source } => {
            ConfigError::ReadFailed { path, source }
        }
    })?;

    let (outcome, patched) =
        patch_source(&file.content, listener).map_err(|reason| ConfigError::MalformedDocument {
            path: path.into(),
            reason,
        })?;
    debug!(path = %path.display(), outcome = outcome.label(), "planned listener patch");

    let written = match patched {
        Some(content) if !options.dry_run => {
            write_text(path, &file.with_content(content)).map_err(|e| match e {
                FsError::Io { path, source } | FsError::AtomicWrite { path, source } => {
                    ConfigError::WriteFailed { path, source }
                }
                other => ConfigError::WriteFailed {
                    path: path.into(),
                    source: std::io::Error::other(other.to_string()),
                },
            })?;
            info!(path = %path.display(), "wrote listener configuration");
            true
        }
        _ => false,
    };

    let line = if options.dry_run && outcome.is_change() {
        format!("Would update {}: {}", path.display(), outcome)
    } else if outcome.is_change() {
        format!("Updated {}: {}", path.display(), outcome)
    } else {
        format!("{} is up to date: {}", path.display(), outcome)
    };
    reporter.info(&line);

    Ok(PatchReport {
        path: path.into(),
        outcome,
        written,
    })
}

/// Applies the listener patch to XML text.
///
/// Returns the outcome and, when something changed, the new text. Bytes
/// outside the edited ranges are kept verbatim.
pub fn patch_source(
    source: &str,
    listener: &ListenerDeclaration,
) -> Result<(PatchOutcome, Option<String>), String> {
    let doc = XmlDocument::parse(source.to_string()).map_err(|e| e.to_string())?;
    let (outcome, edits) = plan(&doc, listener);
    if edits.is_empty() {
        return Ok((outcome, None));
    }
    Ok((outcome, Some(edits.apply(doc.source()))))
}

/// Decides which edits bring the document to the canonical state.
pub fn plan(doc: &XmlDocument, listener: &ListenerDeclaration) -> (PatchOutcome, Edits) {
    let style = Formatting::of(doc);
    match doc.root().child(LISTENERS_SECTION) {
        Some(section) => plan_entries(doc, &style, section, listener),
        None => plan_section(doc, &style, listener),
    }
}

fn plan_entries(
    doc: &XmlDocument,
    style: &Formatting,
    section: &Element,
    listener: &ListenerDeclaration,
) -> (PatchOutcome, Edits) {
    let entries: Vec<&Element> = section.children_named(LISTENER_ELEMENT).collect();
    let mut edits = Edits::new();

    match entries.as_slice() {
        [only] if listener.matches(only) => (PatchOutcome::Unchanged, edits),
        [] => {
            let section_indent = doc.indent_at(section.span().start);
            let entry_indent = format!("{section_indent}{}", style.unit);
            let entry = indent_lines(&listener.lines(&style.unit), &entry_indent, style.newline);
            append_child(doc, style, section, &entry, &mut edits);
            (PatchOutcome::Appended, edits)
        }
        [first, rest @ ..] => {
            let indent = doc.indent_at(first.span().start);
            let entry = indent_lines(&listener.lines(&style.unit), indent, style.newline);
            edits.replace(first.span(), &entry[indent.len()..]);
            for stale in rest {
                edits.delete(line_range(doc.source(), stale.span()));
            }
            (
                PatchOutcome::Replaced {
                    removed: entries.len(),
                },
                edits,
            )
        }
    }
}

fn plan_section(
    doc: &XmlDocument,
    style: &Formatting,
    listener: &ListenerDeclaration,
) -> (PatchOutcome, Edits) {
    let root = doc.root();
    let section_indent = match root.children().first() {
        Some(child) if !doc.indent_at(child.span().start).is_empty() => {
            doc.indent_at(child.span().start).to_string()
        }
        _ => format!("{}{}", doc.indent_at(root.span().start), style.unit),
    };

    let mut lines = vec![format!("<{LISTENERS_SECTION}>")];
    lines.extend(
        listener
            .lines(&style.unit)
            .into_iter()
            .map(|line| format!("{}{line}", style.unit)),
    );
    lines.push(format!("</{LISTENERS_SECTION}>"));
    let section = indent_lines(&lines, &section_indent, style.newline);

    let anchor = root
        .children()
        .iter()
        .rev()
        .find(|child| RELATED_SECTIONS.contains(&child.name()));

    let mut edits = Edits::new();
    match anchor {
        Some(anchor) => {
            debug!(after = anchor.name(), "inserting listener section");
            let at = anchor.span().end;
            let rest = &doc.source()[at..];
            let next = rest.trim_start_matches([' ', '\t']);
            let closes_root = root
                .inner()
                .is_some_and(|inner| inner.end == at + (rest.len() - next.len()));
            let suffix = if next.starts_with(['\r', '\n']) {
                String::new()
            } else if closes_root {
                format!("{}{}", style.newline, doc.indent_at(root.span().start))
            } else {
                format!("{}{section_indent}", style.newline)
            };
            edits.insert(at, format!("{}{section}{suffix}", style.newline));
        }
        None => append_child(doc, style, root, &section, &mut edits),
    }
    (PatchOutcome::SectionCreated, edits)
}

/// Adds an already indented block as the last child of `parent`.
fn append_child(
    doc: &XmlDocument,
    style: &Formatting,
    parent: &Element,
    block: &str,
    edits: &mut Edits,
) {
    let source = doc.source();
    let parent_indent = doc.indent_at(parent.span().start);

    let Some(inner) = parent.inner() else {
        let tag = &source[parent.start_tag()];
        let open = tag.trim_end_matches("/>").trim_end();
        edits.replace(
            parent.span(),
            format!(
                "{open}>{nl}{block}{nl}{parent_indent}</{name}>",
                nl = style.newline,
                name = parent.name()
            ),
        );
        return;
    };

    let content = &source[inner.clone()];
    let tail_start = inner.start + content.trim_end().len();
    let tail = &source[tail_start..inner.end];

    if tail.contains('\n') {
        edits.insert(tail_start, format!("{}{block}", style.newline));
    } else {
        edits.replace(
            tail_start..inner.end,
            format!("{nl}{block}{nl}{parent_indent}", nl = style.newline),
        );
    }
}

/// Formatting conventions detected from the document.
struct Formatting {
    unit: String,
    newline: &'static str,
}

impl Formatting {
    fn of(doc: &XmlDocument) -> Self {
        Self {
            unit: doc.indent_unit(),
            newline: doc.newline(),
        }
    }
}
