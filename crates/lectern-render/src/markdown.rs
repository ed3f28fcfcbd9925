//! Markdown output.
//!
//! Prose is passed through untouched. Each code block is re-fenced and
//! followed by an `Output:` fence holding its captured text and error, then
//! one image link per figure.

use std::io::Write;
use std::path::{Path, PathBuf};

use lectern_core::{Block, CodeBlock, ExecutedDocument, LecternError, Result};

use crate::figure::relative_link;
use crate::is_visible;

/// Renders executed documents as Markdown.
pub struct MarkdownRenderer<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the whole document.
    pub fn render(&mut self, doc: &ExecutedDocument) -> Result<()> {
        let base = figure_base(doc.source_path.as_deref());
        let mut parts = Vec::with_capacity(doc.blocks.len() + 1);

        if !doc.metadata.raw.is_empty() {
            let yaml = serde_yaml::to_string(&doc.metadata.raw)
                .map_err(|e| LecternError::Render(format!("frontmatter: {}", e)))?;
            parts.push(format!("---\n{}---", yaml));
        }

        for block in doc.blocks.iter().filter(|b| is_visible(b)) {
            match block {
                Block::Markdown(md) => parts.push(md.content.clone()),
                Block::Code(code) => parts.extend(code_parts(code, base.as_deref())),
            }
        }

        let mut text = parts.join("\n\n");
        text.push('\n');
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn code_parts(block: &CodeBlock, base: Option<&Path>) -> Vec<String> {
    let mut parts = Vec::new();

    if !block.hidden {
        parts.push(format!(
            "```{}\n{}\n```",
            block.language,
            block.content.trim_end()
        ));
    }

    let output = block.output.as_deref().filter(|s| !s.is_empty());
    let error = block.error.as_deref().filter(|s| !s.is_empty());
    if output.is_some() || error.is_some() {
        let mut section = String::from("Output:\n```\n");
        if let Some(output) = output {
            section.push_str(output);
            section.push('\n');
        }
        if let Some(error) = error {
            section.push_str("Error: ");
            section.push_str(error);
            section.push('\n');
        }
        section.push_str("```");
        parts.push(section);
    }

    for figure in &block.figures {
        parts.push(format!("![Figure]({})", relative_link(figure, base)));
    }

    parts
}

fn figure_base(source: Option<&Path>) -> Option<PathBuf> {
    let parent = source?.parent()?;
    let parent = if parent.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent
    };
    std::path::absolute(parent).ok()
}
