//! Reading and atomically rewriting text files.

use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

const UTF8_BOM: &str = "\u{FEFF}";

/// Errors during file system operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid encoding in {path}: {encoding}")]
    InvalidEncoding { path: PathBuf, encoding: String },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// UTF-8 file contents with the byte order mark split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    pub content: String,
    pub bom: bool,
}

impl TextFile {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bom: false,
        }
    }

    /// Same BOM setting, different content.
    pub fn with_content(&self, content: String) -> Self {
        Self {
            content,
            bom: self.bom,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.content.len() + UTF8_BOM.len());
        if self.bom {
            bytes.extend_from_slice(UTF8_BOM.as_bytes());
        }
        bytes.extend_from_slice(self.content.as_bytes());
        bytes
    }
}

/// Reads a UTF-8 text file.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the file doesn't exist.
/// Returns `FsError::InvalidEncoding` for UTF-16 or otherwise non-UTF-8 content.
/// Returns `FsError::Io` for any other read failure.
pub fn read_text(path: &Path) -> Result<TextFile, FsError> {
    let bytes = std::fs::read(path).map_err(|e| FsError::from_io(path, e))?;

    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(FsError::InvalidEncoding {
            path: path.into(),
            encoding: "UTF-16 byte order mark detected; convert to UTF-8".into(),
        });
    }

    let content = String::from_utf8(bytes).map_err(|e| FsError::InvalidEncoding {
        path: path.into(),
        encoding: format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()),
    })?;

    Ok(match content.strip_prefix(UTF8_BOM) {
        Some(rest) => TextFile {
            content: rest.to_string(),
            bom: true,
        },
        None => TextFile {
            content,
            bom: false,
        },
    })
}

/// Replaces the contents of an existing file atomically.
///
/// Writes to a temporary file in the same directory, copies the original
/// permissions onto it, then renames it over `path`. On failure the
/// original file is left as it was.
pub fn write_text(path: &Path, file: &TextFile) -> Result<(), FsError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let io_error = |e: io::Error| FsError::Io {
        path: path.into(),
        source: e,
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(io_error)?;
    temp.write_all(&file.to_bytes()).map_err(io_error)?;

    if let Ok(metadata) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_error)?;
    }

    temp.persist(path).map_err(|e| FsError::AtomicWrite {
        path: path.into(),
        source: e.error,
    })?;

    Ok(())
}
