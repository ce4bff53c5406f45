//! Byte-range edits applied to source text.

use std::ops::Range;

/// A single replacement of a byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub replacement: String,
}

/// A set of non-overlapping edits against one source text.
///
/// Everything outside the edited ranges is copied verbatim by [`Edits::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edits {
    splices: Vec<Splice>,
}

impl Edits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, range: Range<usize>, replacement: impl Into<String>) {
        self.splices.push(Splice {
            range,
            replacement: replacement.into(),
        });
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    pub fn delete(&mut self, range: Range<usize>) {
        self.replace(range, String::new());
    }

    pub fn is_empty(&self) -> bool {
        self.splices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.splices.len()
    }

    /// Applies the edits to `source` and returns the new text.
    ///
    /// Ranges must lie on char boundaries and must not overlap.
    pub fn apply(&self, source: &str) -> String {
        let mut splices: Vec<&Splice> = self.splices.iter().collect();
        splices.sort_by_key(|s| (s.range.start, s.range.end));

        let mut output = String::with_capacity(source.len());
        let mut cursor = 0;
        for splice in splices {
            debug_assert!(splice.range.start >= cursor, "overlapping edits");
            output.push_str(&source[cursor..splice.range.start]);
            output.push_str(&splice.replacement);
            cursor = splice.range.end;
        }
        output.push_str(&source[cursor..]);
        output
    }
}

/// Range covering `span` plus the whitespace and line break before it.
///
/// When `span` starts its own line, deleting the returned range removes the
/// line entirely instead of leaving blank indentation behind.
pub fn line_range(source: &str, span: Range<usize>) -> Range<usize> {
    let before = &source[..span.start];
    let trimmed = before.trim_end_matches([' ', '\t']);
    let start = if let Some(rest) = trimmed.strip_suffix("\r\n") {
        rest.len()
    } else if let Some(rest) = trimmed.strip_suffix('\n') {
        rest.len()
    } else {
        span.start
    };
    start..span.end
}

/// Prefixes each line with `indent` and joins them with `newline`.
pub fn indent_lines(lines: &[String], indent: &str, newline: &str) -> String {
    lines
        .iter()
        .map(|line| format!("{indent}{line}"))
        .collect::<Vec<_>>()
        .join(newline)
}
