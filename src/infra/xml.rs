//! Span-preserving XML element outline.
//!
//! The document is parsed with `quick-xml` into a tree of elements that
//! remember the byte ranges of their tags in the source text. Text,
//! comments and declarations are not stored as nodes: they stay in the
//! source and are carried over untouched when edits are spliced in.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::ops::Range;
use thiserror::Error;

const DEFAULT_INDENT_UNIT: &str = "    ";

/// Errors while building the element outline.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XmlError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("document has no root element")]
    NoRoot,

    #[error("line {line}: content outside the root element")]
    OutsideRoot { line: usize },

    #[error("line {line}: element <{name}> is never closed")]
    Unclosed { line: usize, name: String },

    #[error("line {line}: expected </{expected}>, found </{found}>")]
    MismatchedEnd {
        line: usize,
        expected: String,
        found: String,
    },
}

/// An element and the byte ranges of its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    start_tag: Range<usize>,
    end_tag: Option<Range<usize>>,
    children: Vec<Element>,
}

impl Element {
    fn open(tag: &BytesStart<'_>, start_tag: Range<usize>) -> Result<Self, String> {
        let name = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            if attr.value.contains(&b'<') {
                return Err(format!("raw '<' in value of attribute `{key}`"));
            }
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(|e| e.to_string())?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            start_tag,
            end_tag: None,
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the unescaped value of an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Byte range of the opening tag (the whole tag when self-closing).
    pub fn start_tag(&self) -> Range<usize> {
        self.start_tag.clone()
    }

    /// Byte range of the whole element, tags included.
    pub fn span(&self) -> Range<usize> {
        let end = self
            .end_tag
            .as_ref()
            .map_or(self.start_tag.end, |tag| tag.end);
        self.start_tag.start..end
    }

    /// Byte range between the opening and closing tags.
    ///
    /// `None` for self-closing elements.
    pub fn inner(&self) -> Option<Range<usize>> {
        self.end_tag
            .as_ref()
            .map(|end| self.start_tag.end..end.start)
    }
}

/// A parsed document: the original text plus its element outline.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    source: String,
    root: Element,
}

impl XmlDocument {
    /// Parses `source` into an outline.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid markup, mismatched or unclosed tags,
    /// a missing root element, or content outside the root.
    pub fn parse(source: String) -> Result<Self, XmlError> {
        let root = build_outline(&source)?;
        Ok(Self { source, root })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The line ending used by the document.
    pub fn newline(&self) -> &'static str {
        if self.source.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Whitespace preceding `offset` on its line.
    ///
    /// Empty when anything other than spaces or tabs precedes `offset` on
    /// the same line.
    pub fn indent_at(&self, offset: usize) -> &str {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &self.source[line_start..offset];
        if prefix.chars().all(|c| c == ' ' || c == '\t') {
            prefix
        } else {
            ""
        }
    }

    /// The indentation step between nesting levels.
    ///
    /// Taken from the first element whose child is indented deeper than
    /// itself; four spaces when the document gives no hint.
    pub fn indent_unit(&self) -> String {
        self.find_indent_unit(&self.root)
            .unwrap_or_else(|| DEFAULT_INDENT_UNIT.to_string())
    }

    fn find_indent_unit(&self, element: &Element) -> Option<String> {
        let parent_indent = self.indent_at(element.start_tag.start);
        for child in &element.children {
            let child_indent = self.indent_at(child.start_tag.start);
            if child_indent.len() > parent_indent.len() && child_indent.starts_with(parent_indent)
            {
                return Some(child_indent[parent_indent.len()..].to_string());
            }
        }
        element
            .children
            .iter()
            .find_map(|child| self.find_indent_unit(child))
    }
}

/// Returns the 1-based line number of a byte offset.
pub fn line_of(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

fn build_outline(source: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let start = tag_start(source, reader.buffer_position() as usize);
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            line: line_of(source, reader.buffer_position() as usize),
            message: e.to_string(),
        })?;
        let end = reader.buffer_position() as usize;

        match event {
            Event::Start(tag) => {
                ensure_single_root(source, &stack, &root, end)?;
                let element = open_element(source, &tag, start..end)?;
                stack.push(element);
            }
            Event::Empty(tag) => {
                ensure_single_root(source, &stack, &root, end)?;
                let element = open_element(source, &tag, start..end)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(tag) => {
                let found = String::from_utf8_lossy(tag.name().as_ref()).into_owned();
                let Some(mut element) = stack.pop() else {
                    return Err(XmlError::Syntax {
                        line: line_of(source, end),
                        message: format!("unexpected closing tag </{found}>"),
                    });
                };
                if element.name != found {
                    return Err(XmlError::MismatchedEnd {
                        line: line_of(source, end),
                        expected: element.name,
                        found,
                    });
                }
                element.end_tag = Some(start..end);
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) if stack.is_empty() => {
                if !text.iter().all(u8::is_ascii_whitespace) {
                    return Err(XmlError::OutsideRoot {
                        line: line_of(source, end),
                    });
                }
            }
            Event::CData(_) | Event::GeneralRef(_) if stack.is_empty() => {
                return Err(XmlError::OutsideRoot {
                    line: line_of(source, end),
                });
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Unclosed {
            line: line_of(source, open.start_tag.start),
            name: open.name.clone(),
        });
    }

    root.ok_or(XmlError::NoRoot)
}

fn ensure_single_root(
    source: &str,
    stack: &[Element],
    root: &Option<Element>,
    end: usize,
) -> Result<(), XmlError> {
    if stack.is_empty() && root.is_some() {
        return Err(XmlError::OutsideRoot {
            line: line_of(source, end),
        });
    }
    Ok(())
}

fn open_element(
    source: &str,
    tag: &BytesStart<'_>,
    span: Range<usize>,
) -> Result<Element, XmlError> {
    let line = line_of(source, span.start);
    Element::open(tag, span).map_err(|message| XmlError::Syntax { line, message })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

// The reader rests either on the `<` of the next markup or just past it.
fn tag_start(source: &str, position: usize) -> usize {
    let bytes = source.as_bytes();
    match bytes.get(position) {
        Some(b'<') => position,
        _ if position > 0 && bytes[position - 1] == b'<' => position - 1,
        _ => source[position..]
            .find('<')
            .map_or(position, |offset| position + offset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Result<XmlDocument, XmlError> {
        XmlDocument::parse(source.to_string())
    }

    // ===========================================
    // Outline
    // ===========================================

    #[test]
    fn parses_root_and_children() {
        let doc = parse("<phpunit><php/><listeners></listeners></phpunit>").unwrap();
        let root = doc.root();
        assert_eq!(root.name(), "phpunit");
        let names: Vec<_> = root.children().iter().map(Element::name).collect();
        assert_eq!(names, vec!["php", "listeners"]);
    }

    #[test]
    fn spans_cover_tags() {
        let source = "<a>\n  <b x=\"1\"/>\n  <c>text</c>\n</a>";
        let doc = parse(source).unwrap();
        let b = doc.root().child("b").unwrap();
        assert_eq!(&source[b.span()], "<b x=\"1\"/>");
        assert_eq!(b.inner(), None);

        let c = doc.root().child("c").unwrap();
        assert_eq!(&source[c.span()], "<c>text</c>");
        assert_eq!(&source[c.inner().unwrap()], "text");
        assert_eq!(&source[doc.root().span()], source);
    }

    #[test]
    fn attributes_are_unescaped() {
        let doc = parse(r#"<a class="Foo\Bar" note="x &amp; y"/>"#).unwrap();
        assert_eq!(doc.root().attribute("class"), Some("Foo\\Bar"));
        assert_eq!(doc.root().attribute("note"), Some("x & y"));
        assert_eq!(doc.root().attribute("missing"), None);
    }

    #[test]
    fn declaration_and_comments_are_skipped() {
        let source = "<?xml version=\"1.0\"?>\n<!-- header -->\n<phpunit>\n    <!-- inner -->\n</phpunit>\n";
        let doc = parse(source).unwrap();
        assert_eq!(doc.root().name(), "phpunit");
        assert!(doc.root().children().is_empty());
        assert_eq!(doc.source(), source);
    }

    #[test]
    fn children_named_filters_by_name() {
        let doc = parse("<l><listener a=\"1\"/><other/><listener a=\"2\"/></l>").unwrap();
        let values: Vec<_> = doc
            .root()
            .children_named("listener")
            .filter_map(|e| e.attribute("a"))
            .collect();
        assert_eq!(values, vec!["1", "2"]);
    }

    // ===========================================
    // Malformed input
    // ===========================================

    #[test]
    fn empty_document_has_no_root() {
        assert_eq!(parse("").unwrap_err(), XmlError::NoRoot);
        assert_eq!(parse("  \n ").unwrap_err(), XmlError::NoRoot);
    }

    #[test]
    fn unclosed_element_is_rejected() {
        assert!(parse("<phpunit><listeners>").is_err());
    }

    #[test]
    fn mismatched_end_is_rejected() {
        assert!(parse("<phpunit><listeners></phpunit></listeners>").is_err());
    }

    #[test]
    fn second_root_is_rejected() {
        assert!(matches!(parse("<a/><b/>"), Err(XmlError::OutsideRoot { .. })));
    }

    #[test]
    fn text_outside_root_is_rejected() {
        assert!(parse("hello <a/>").is_err());
        assert!(parse("<a/> trailing").is_err());
    }

    #[test]
    fn references_and_cdata_outside_root_are_rejected() {
        assert!(matches!(parse("<phpunit/>&amp;"), Err(XmlError::OutsideRoot { .. })));
        assert!(matches!(parse("<phpunit/><![CDATA[x]]>"), Err(XmlError::OutsideRoot { .. })));
    }

    #[test]
    fn raw_angle_bracket_in_attribute_is_rejected() {
        let err = parse(r#"<phpunit><listener class="a<b"/></phpunit>"#).unwrap_err();
        assert!(matches!(err, XmlError::Syntax { line: 1, .. }));
    }

    #[test]
    fn spans_start_at_tag_after_text_and_comments() {
        let source = "<a>x &gt; y<!-- c --><b/>\n  <c>t</c></a>";
        let doc = parse(source).unwrap();
        assert_eq!(&source[doc.root().child("b").unwrap().span()], "<b/>");
        assert_eq!(&source[doc.root().child("c").unwrap().span()], "<c>t</c>");
    }

    #[test]
    fn broken_markup_reports_line() {
        let err = parse("<a>\n<b\n").unwrap_err();
        assert!(err.to_string().starts_with("line "));
    }

    // ===========================================
    // Formatting hints
    // ===========================================

    #[test]
    fn newline_detects_crlf() {
        assert_eq!(parse("<a>\r\n</a>").unwrap().newline(), "\r\n");
        assert_eq!(parse("<a>\n</a>").unwrap().newline(), "\n");
    }

    #[test]
    fn indent_unit_detected_from_children() {
        let doc = parse("<a>\n  <b/>\n</a>").unwrap();
        assert_eq!(doc.indent_unit(), "  ");

        let doc = parse("<a>\n\t<b/>\n</a>").unwrap();
        assert_eq!(doc.indent_unit(), "\t");
    }

    #[test]
    fn indent_unit_defaults_to_four_spaces() {
        let doc = parse("<a><b/></a>").unwrap();
        assert_eq!(doc.indent_unit(), "    ");
    }

    #[test]
    fn indent_at_ignores_inline_positions() {
        let source = "<a>\n    <b/><c/>\n</a>";
        let doc = parse(source).unwrap();
        let b = doc.root().child("b").unwrap();
        let c = doc.root().child("c").unwrap();
        assert_eq!(doc.indent_at(b.span().start), "    ");
        assert_eq!(doc.indent_at(c.span().start), "");
    }

    #[test]
    fn line_of_counts_newlines() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 2), 2);
        assert_eq!(line_of("a\nb\nc", 100), 3);
    }
}
