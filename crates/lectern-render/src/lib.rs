//! Lectern Render
//!
//! This crate projects an executed document into its final text form,
//! attaching outputs, errors and figures under the code that produced them.
//!
//! # Features
//!
//! - **Markdown** - Source re-emitted with `Output:` fences and figure links
//! - **HTML** - Standalone page with highlighted code and embedded figures
//! - **Frontmatter passthrough** - Markdown re-renders keep the YAML header
//!
//! # Example
//!
//! ```
//! use lectern_core::{CodeBlock, ExecutedDocument, OutputFormat};
//! use lectern_render::render;
//!
//! let mut block = CodeBlock::python("2 + 2", 1);
//! block.output = Some("4".to_string());
//! let doc = ExecutedDocument {
//!     blocks: vec![block.into()],
//!     ..Default::default()
//! };
//!
//! let text = render(&doc, Some(OutputFormat::Markdown)).unwrap();
//! assert!(text.contains("Output:"));
//! ```

pub mod assets;
pub mod figure;
pub mod html;
pub mod markdown;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;

use std::io::Write;

use lectern_core::{Block, ExecutedDocument, OutputFormat, Result};
use log::debug;

/// Render `doc` to a string.
///
/// Without an explicit format the document's own `output` metadata decides.
pub fn render(doc: &ExecutedDocument, format: Option<OutputFormat>) -> Result<String> {
    let mut buffer = Vec::new();
    render_to(&mut buffer, doc, format)?;
    String::from_utf8(buffer)
        .map_err(|e| lectern_core::LecternError::Render(format!("output is not UTF-8: {}", e)))
}

/// Render `doc` into `writer`.
pub fn render_to<W: Write>(
    writer: W,
    doc: &ExecutedDocument,
    format: Option<OutputFormat>,
) -> Result<()> {
    let format = format.unwrap_or(doc.metadata.output);
    debug!("Rendering {} blocks as {}", doc.blocks.len(), format);
    match format {
        OutputFormat::Markdown => MarkdownRenderer::new(writer).render(doc),
        OutputFormat::Html => HtmlRenderer::new(writer).render(doc),
    }
}

/// Whether a block appears in rendered output at all.
///
/// Hidden code only shows up when it left artifacts behind, and then
/// without its source. Blocks with nothing to show are dropped.
pub fn is_visible(block: &Block) -> bool {
    match block {
        Block::Markdown(md) => !md.content.trim().is_empty(),
        Block::Code(code) if code.hidden => code.has_artifacts(),
        Block::Code(code) => !code.content.trim().is_empty() || code.has_artifacts(),
    }
}
