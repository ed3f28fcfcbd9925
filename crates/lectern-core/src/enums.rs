//! Small enums shared across the pipeline.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LecternError;

/// The kind of a parsed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Markdown prose
    Markdown,
    /// Source code, possibly executable
    Code,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Markdown => write!(f, "markdown"),
            BlockKind::Code => write!(f, "code"),
        }
    }
}

/// Target format of a rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Annotated Markdown
    #[default]
    #[serde(alias = "md")]
    Markdown,
    /// Standalone HTML page
    Html,
}

impl OutputFormat {
    /// Interpret a loosely-typed format name.
    ///
    /// Anything other than `html` falls back to Markdown.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("html") {
            OutputFormat::Html
        } else {
            OutputFormat::Markdown
        }
    }

    /// File extension used for default output paths.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = LecternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "html" => Ok(OutputFormat::Html),
            other => Err(LecternError::Value(format!(
                "unsupported output format '{}' (expected markdown, md or html)",
                other
            ))),
        }
    }
}

/// Coarse classification of document-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A file or directory was missing
    NotFound,
    /// A value was rejected
    Value,
    /// Anything else
    Generic,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "file-not-found"),
            FailureKind::Value => write!(f, "value-error"),
            FailureKind::Generic => write!(f, "error"),
        }
    }
}
