//! The subset of nbformat 4 that conversion reads and writes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Major format version written on export.
pub const NBFORMAT: u32 = 4;

/// Minor format version written on export; 4.5 introduced cell ids.
pub const NBFORMAT_MINOR: u32 = 5;

/// A whole notebook file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub nbformat: u32,
    pub nbformat_minor: u32,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

impl Default for Notebook {
    fn default() -> Self {
        Self {
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            metadata: Map::new(),
            cells: Vec::new(),
        }
    }
}

/// Cell text, stored either as one string or as a list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Source {
    /// The full text with lines concatenated.
    pub fn text(&self) -> String {
        match self {
            Source::Text(s) => s.clone(),
            Source::Lines(lines) => lines.concat(),
        }
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source::Text(text)
    }
}

/// Per-cell metadata; only tags matter here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CellMetadata {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// One notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell_type", rename_all = "lowercase")]
pub enum Cell {
    Markdown {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        #[serde(default)]
        source: Source,
    },
    Code {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        #[serde(default)]
        source: Source,
        #[serde(default)]
        execution_count: Option<u32>,
        #[serde(default)]
        outputs: Vec<Output>,
    },
    Raw {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default)]
        metadata: CellMetadata,
        #[serde(default)]
        source: Source,
    },
}

impl Cell {
    pub fn markdown(id: String, text: String) -> Self {
        Cell::Markdown {
            id: Some(id),
            metadata: CellMetadata::default(),
            source: text.into(),
        }
    }

    pub fn code(id: String, text: String, tags: Vec<String>) -> Self {
        Cell::Code {
            id: Some(id),
            metadata: CellMetadata {
                tags,
                extra: Map::new(),
            },
            source: text.into(),
            execution_count: None,
            outputs: Vec::new(),
        }
    }

    pub fn source(&self) -> &Source {
        match self {
            Cell::Markdown { source, .. } | Cell::Code { source, .. } | Cell::Raw { source, .. } => {
                source
            }
        }
    }

    pub fn metadata(&self) -> &CellMetadata {
        match self {
            Cell::Markdown { metadata, .. }
            | Cell::Code { metadata, .. }
            | Cell::Raw { metadata, .. } => metadata,
        }
    }
}

/// A code cell output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    Stream {
        name: String,
        text: Source,
    },
    Error {
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
    /// Rich outputs, read and discarded
    #[serde(other)]
    Other,
}

impl Output {
    pub fn stdout(text: String) -> Self {
        Output::Stream {
            name: "stdout".to_string(),
            text: text.into(),
        }
    }
}
