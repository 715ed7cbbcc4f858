//! Error types for parsing and rendering.

use std::path::{Path, PathBuf};

/// Error type for codec operations.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// Lexer error (invalid token)
    #[error("lexer error at position {position}: {message}")]
    Lexer { position: usize, message: String },

    /// Parser error (unexpected token or invalid structure)
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Malformed line in a line-based format
    #[error("parse error at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// Prefix not defined
    #[error("undefined prefix: {0}")]
    UndefinedPrefix(String),

    /// Low-level XML error from the RDF/XML reader
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// RDF/XML structure the codec cannot express or interpret
    #[error("rdf/xml error: {0}")]
    RdfXml(String),

    /// File cannot be opened, read, or written
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, FormatError>;

impl FormatError {
    /// Create a lexer error
    pub fn lexer(position: usize, message: impl Into<String>) -> Self {
        Self::Lexer {
            position,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a malformed-line error
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
