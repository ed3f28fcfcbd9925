//! Error types for lectern

use std::path::PathBuf;

use thiserror::Error;

use crate::enums::FailureKind;

/// Main error type for lectern operations.
///
/// These are document-level failures. A failing code block is never one of
/// these: its error text is attached to the block instead.
#[derive(Error, Debug)]
pub enum LecternError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required input file or directory does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// An argument or setting has an unusable value
    #[error("Invalid value: {0}")]
    Value(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error outside the silently-recovered frontmatter path
    #[error("Parse error: {0}")]
    Parse(String),

    /// The interpreter session could not be started or stopped responding
    #[error("Interpreter error: {0}")]
    Interpreter(String),

    /// Unknown syntax highlighting theme
    #[error("Unknown code theme '{name}'.{suggestion}")]
    Theme {
        /// The requested theme name
        name: String,
        /// Hint listing similar or available themes
        suggestion: String,
    },

    /// Render error during output generation
    #[error("Render error: {0}")]
    Render(String),

    /// Notebook conversion error
    #[error("Notebook error: {0}")]
    Notebook(String),
}

impl LecternError {
    /// Classify this error for the boundary layer.
    pub fn kind(&self) -> FailureKind {
        match self {
            LecternError::NotFound(_) => FailureKind::NotFound,
            LecternError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                FailureKind::NotFound
            }
            LecternError::Value(_) | LecternError::Theme { .. } => FailureKind::Value,
            _ => FailureKind::Generic,
        }
    }
}

/// Result type alias for lectern operations
pub type Result<T> = std::result::Result<T, LecternError>;
