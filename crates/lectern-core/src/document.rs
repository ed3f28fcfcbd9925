//! The block model.
//!
//! A [`Document`] is an ordered list of [`Block`]s produced once by a parser.
//! Execution only ever fills in the dynamic fields of code blocks and
//! rewrites markdown text; it never reorders blocks.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::enums::BlockKind;
use crate::metadata::DocumentMetadata;

/// The only language whose code blocks are executed.
pub const EXECUTABLE_LANGUAGE: &str = "python";

/// A run of markdown prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkdownBlock {
    /// Raw markdown text
    pub content: String,
    /// 1-based source line where the block started (0 if unknown)
    pub line_number: usize,
}

impl MarkdownBlock {
    /// Create a markdown block.
    pub fn new(content: impl Into<String>, line_number: usize) -> Self {
        Self {
            content: content.into(),
            line_number,
        }
    }
}

/// A code block and, after execution, its captured artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Source code
    pub content: String,
    /// Declared language tag
    pub language: String,
    /// Excluded from rendered output, still executed
    pub hidden: bool,
    /// 1-based source line of the first code line (0 if unknown)
    pub line_number: usize,
    /// Captured standard output, trailing whitespace trimmed
    pub output: Option<String>,
    /// Formatted exception, if execution failed
    pub error: Option<String>,
    /// Saved figure images in generation order
    pub figures: Vec<PathBuf>,
}

impl CodeBlock {
    /// Create an unexecuted code block.
    pub fn new(
        content: impl Into<String>,
        language: impl Into<String>,
        hidden: bool,
        line_number: usize,
    ) -> Self {
        Self {
            content: content.into(),
            language: language.into(),
            hidden,
            line_number,
            output: None,
            error: None,
            figures: Vec::new(),
        }
    }

    /// Create an unexecuted Python block.
    pub fn python(content: impl Into<String>, line_number: usize) -> Self {
        Self::new(content, EXECUTABLE_LANGUAGE, false, line_number)
    }

    /// Whether this block's language is the executable one.
    pub fn is_executable(&self) -> bool {
        self.language.eq_ignore_ascii_case(EXECUTABLE_LANGUAGE)
    }

    /// Whether execution left anything worth showing.
    pub fn has_artifacts(&self) -> bool {
        self.output.as_deref().is_some_and(|s| !s.is_empty())
            || self.error.as_deref().is_some_and(|s| !s.is_empty())
            || !self.figures.is_empty()
    }
}

/// One ordered unit of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    /// Markdown prose
    Markdown(MarkdownBlock),
    /// Code, executable or not
    Code(CodeBlock),
}

impl Block {
    /// The kind tag of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Markdown(_) => BlockKind::Markdown,
            Block::Code(_) => BlockKind::Code,
        }
    }

    /// Raw text of the block.
    pub fn content(&self) -> &str {
        match self {
            Block::Markdown(b) => &b.content,
            Block::Code(b) => &b.content,
        }
    }

    /// Source line where the block started.
    pub fn line_number(&self) -> usize {
        match self {
            Block::Markdown(b) => b.line_number,
            Block::Code(b) => b.line_number,
        }
    }

    /// Only code blocks can be hidden.
    pub fn is_hidden(&self) -> bool {
        match self {
            Block::Markdown(_) => false,
            Block::Code(b) => b.hidden,
        }
    }

    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            Block::Code(b) => Some(b),
            Block::Markdown(_) => None,
        }
    }

    pub fn as_markdown(&self) -> Option<&MarkdownBlock> {
        match self {
            Block::Markdown(b) => Some(b),
            Block::Code(_) => None,
        }
    }
}

impl From<MarkdownBlock> for Block {
    fn from(block: MarkdownBlock) -> Self {
        Block::Markdown(block)
    }
}

impl From<CodeBlock> for Block {
    fn from(block: CodeBlock) -> Self {
        Block::Code(block)
    }
}

/// A marker embedded in markdown prose.
///
/// `<%= expr %>` is a value marker (`is_statement == false`), `<% stmt %>`
/// a statement marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineExpression {
    /// The code between the delimiters, surrounding whitespace removed
    pub expression: String,
    /// True for statement markers
    pub is_statement: bool,
    /// Byte offset of the marker's `<%` in the enclosing text
    pub position: usize,
}

/// A parsed, not yet executed, document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in source order
    pub blocks: Vec<Block>,
    /// Frontmatter metadata
    pub metadata: DocumentMetadata,
    /// Where the document was read from
    pub source_path: Option<PathBuf>,
}

impl Document {
    /// Create a document from blocks and metadata.
    pub fn new(blocks: Vec<Block>, metadata: DocumentMetadata) -> Self {
        Self {
            blocks,
            metadata,
            source_path: None,
        }
    }

    /// Attach a source path.
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Iterate over code blocks only.
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter().filter_map(Block::as_code)
    }

    /// Sequence of block kinds, in order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }
}

/// A document after execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutedDocument {
    /// Blocks in source order, code blocks carrying their artifacts
    pub blocks: Vec<Block>,
    /// Frontmatter metadata
    pub metadata: DocumentMetadata,
    /// Where the document was read from
    pub source_path: Option<PathBuf>,
    /// Final user-visible bindings, name to repr
    pub namespace: BTreeMap<String, String>,
    /// Reserved for document-wide error aggregation; the executor leaves it
    /// empty and reports failures on the blocks themselves.
    pub execution_errors: Vec<String>,
}

impl ExecutedDocument {
    /// Wrap a document whose blocks have already been executed.
    pub fn from_document(doc: Document) -> Self {
        Self {
            blocks: doc.blocks,
            metadata: doc.metadata,
            source_path: doc.source_path,
            namespace: BTreeMap::new(),
            execution_errors: Vec::new(),
        }
    }

    /// Iterate over code blocks only.
    pub fn code_blocks(&self) -> impl Iterator<Item = &CodeBlock> {
        self.blocks.iter().filter_map(Block::as_code)
    }

    /// Sequence of block kinds, in order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }
}
