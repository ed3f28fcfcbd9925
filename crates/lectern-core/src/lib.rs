//! Lectern Core
//!
//! This crate provides the document model, metadata and error definitions
//! shared by every stage of the lectern pipeline.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`Block`], [`MarkdownBlock`], [`CodeBlock`] - The ordered block model
//! - [`InlineExpression`] - Markers found inside markdown prose
//! - [`Document`], [`ExecutedDocument`] - Parsed and executed documents
//! - [`DocumentMetadata`] - Typed frontmatter with a raw passthrough
//! - [`BlockKind`], [`OutputFormat`], [`FailureKind`] - Small enums
//! - [`LecternError`] - Error types

pub mod document;
pub mod enums;
pub mod error;
pub mod metadata;

pub use document::{
    Block, CodeBlock, Document, ExecutedDocument, InlineExpression, MarkdownBlock,
    EXECUTABLE_LANGUAGE,
};
pub use enums::{BlockKind, FailureKind, OutputFormat};
pub use error::{LecternError, Result};
pub use metadata::DocumentMetadata;
