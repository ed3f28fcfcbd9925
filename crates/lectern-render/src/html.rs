//! Standalone HTML output.

use std::io::Write;

use lectern_core::{Block, CodeBlock, ExecutedDocument, Result};
use lectern_syntax::{escape_html, Highlighter, DEFAULT_THEME};
use log::debug;
use pulldown_cmark::{html, Options, Parser};

use crate::assets::{footer, BASE_CSS, DEFAULT_TITLE};
use crate::figure::data_uri;
use crate::is_visible;

/// Renders executed documents as a single HTML page.
pub struct HtmlRenderer<W: Write> {
    writer: W,
    highlighter: Highlighter,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_highlighter(writer, Highlighter::new())
    }

    /// Reuse an existing highlighter; its syntax sets are costly to load.
    pub fn with_highlighter(writer: W, highlighter: Highlighter) -> Self {
        Self {
            writer,
            highlighter,
        }
    }

    /// Write the whole page.
    ///
    /// Fails before writing anything when the document names an unknown
    /// code theme.
    pub fn render(&mut self, doc: &ExecutedDocument) -> Result<()> {
        let theme = doc.metadata.code_theme.as_deref().unwrap_or(DEFAULT_THEME);
        self.highlighter.set_theme(theme)?;
        let theme_css = self.highlighter.css()?;

        let mut parts = vec![
            "<!DOCTYPE html>".to_string(),
            "<html>".to_string(),
            "<head>".to_string(),
            "<meta charset=\"utf-8\">".to_string(),
            format!("<title>{}</title>", escape_html(&page_title(doc))),
            format!("<style>\n{}\n{}</style>", BASE_CSS, theme_css),
            "</head>".to_string(),
            "<body>".to_string(),
        ];

        for block in doc.blocks.iter().filter(|b| is_visible(b)) {
            match block {
                Block::Markdown(md) => parts.push(markdown_to_html(&md.content)),
                Block::Code(code) => parts.push(self.code_block(code)),
            }
        }

        if doc.metadata.show_footer {
            parts.push(footer());
        }
        parts.push("</body>".to_string());
        parts.push("</html>".to_string());

        let mut page = parts.join("\n");
        page.push('\n');
        self.writer.write_all(page.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn code_block(&self, block: &CodeBlock) -> String {
        let mut parts = vec!["<div class=\"code-block\">".to_string()];

        if !block.hidden {
            let highlighted = self
                .highlighter
                .highlight_html(block.content.trim_end(), &block.language);
            parts.push(format!(
                "<div class=\"code-input\"><pre class=\"highlight\"><code>{}</code></pre></div>",
                highlighted.trim_end()
            ));
        }

        if let Some(output) = block.output.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("<pre class=\"code-output\">{}</pre>", escape_html(output)));
        }
        if let Some(error) = block.error.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("<pre class=\"error\">{}</pre>", escape_html(error)));
        }

        for figure in &block.figures {
            let src = data_uri(figure).unwrap_or_else(|| figure.display().to_string());
            parts.push(format!("<img src=\"{}\" alt=\"Figure\">", escape_html(&src)));
        }

        parts.push("</div>".to_string());
        parts.join("\n")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Metadata title, else the source file stem, else a fixed default.
pub fn page_title(doc: &ExecutedDocument) -> String {
    doc.metadata
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            doc.source_path
                .as_deref()
                .and_then(|p| p.file_stem())
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Convert prose to HTML with tables, strikethrough and footnotes.
pub fn markdown_to_html(text: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    debug!("Converted {} bytes of markdown", text.len());
    out.trim_end().to_string()
}
