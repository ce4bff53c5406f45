//! File I/O and XML outline parsing

mod fs;
mod splice;
mod xml;

pub use fs::{FsError, TextFile, read_text, write_text};
pub use splice::{Edits, indent_lines, line_range};
pub use xml::{Element, XmlDocument, XmlError, line_of};
