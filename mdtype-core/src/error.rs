//! Error types for conversion operations

use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur while converting or publishing a document
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Reading or writing a file failed
    Io { path: PathBuf, message: String },
    /// The Markdown source could not be turned into a document tree
    ParseError(String),
    /// A diagram could not be rendered
    RenderError(String),
    /// The Typst compiler failed
    CompileError(String),
    /// A required external binary could not be located
    ToolNotFound(String),
}

impl ConvertError {
    pub(crate) fn io(path: impl AsRef<Path>, err: impl fmt::Display) -> Self {
        ConvertError::Io {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Io { path, message } => {
                write!(f, "I/O error on '{}': {message}", path.display())
            }
            ConvertError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConvertError::RenderError(msg) => write!(f, "Diagram rendering error: {msg}"),
            ConvertError::CompileError(msg) => write!(f, "Typst compilation failed: {msg}"),
            ConvertError::ToolNotFound(msg) => write!(f, "Tool not found: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}
