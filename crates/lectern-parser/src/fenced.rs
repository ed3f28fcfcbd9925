//! Fenced-markdown front end.
//!
//! Prose lives between ```` ``` ```` fences; every fence pair is one code
//! block. The first word of the fence info string is the language; an
//! optional `{...}` attribute block may follow. Any other info text, such
//! as `title="x"`, is ignored.

use std::sync::LazyLock;

use lectern_core::{Block, CodeBlock, Document, DocumentMetadata, MarkdownBlock};
use regex::Regex;

use crate::{code_is_empty, frontmatter, trim_blank_lines};

/// Opening fence: language word, then the rest of the info string.
/// Info strings of backtick fences never contain backticks.
static FENCE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```+\s*([^\s`{]*)([^`]*)$").unwrap());

/// `{...}` attribute block inside the info string.
static FENCE_ATTRS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Closing fence: backticks only.
static FENCE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*```+\s*$").unwrap());

/// Attributes parsed from a fence's `{...}` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceAttributes {
    /// Bare `hidden` token or `hide=true`
    pub hidden: bool,
    /// First bare token that names a language, as in `{python}` or `{.python}`
    pub language: Option<String>,
}

impl FenceAttributes {
    /// Parse the text between the braces.
    pub fn parse(attrs: &str) -> Self {
        let mut parsed = FenceAttributes::default();
        let inner = attrs.trim().trim_start_matches('{').trim_end_matches('}');

        for token in inner
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            match token.split_once('=') {
                Some((key, value)) => {
                    let value = value.trim_matches(|c| c == '"' || c == '\'');
                    if matches!(key.trim(), "hide" | "hidden") {
                        parsed.hidden = value.eq_ignore_ascii_case("true");
                    }
                }
                None if token == "hidden" || token == "hide" => parsed.hidden = true,
                None => {
                    if parsed.language.is_none() {
                        parsed.language = Some(token.trim_start_matches('.').to_string());
                    }
                }
            }
        }

        parsed
    }
}

/// Parse fenced markdown into a [`Document`].
pub fn parse(text: &str) -> Document {
    let lines: Vec<&str> = text.lines().collect();

    let (metadata, start) = match frontmatter::split_fenced(&lines) {
        Some(fm) => (fm.metadata, fm.consumed_lines),
        None => (DocumentMetadata::default(), 0),
    };

    let mut blocks = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut prose_start = start;
    let mut idx = start;

    while idx < lines.len() {
        let Some(caps) = FENCE_OPEN_RE.captures(lines[idx]) else {
            if prose.is_empty() {
                prose_start = idx;
            }
            prose.push(lines[idx]);
            idx += 1;
            continue;
        };

        flush_markdown(&mut blocks, &mut prose, prose_start);

        let info = caps.get(2).map_or("", |m| m.as_str());
        let attrs = FENCE_ATTRS_RE
            .find(info)
            .map(|m| FenceAttributes::parse(m.as_str()))
            .unwrap_or_default();
        let mut language = caps.get(1).map_or("", |m| m.as_str()).to_string();
        if language.is_empty() {
            language = attrs.language.clone().unwrap_or_default();
        }

        let fence_line = idx;
        let mut body = Vec::new();
        idx += 1;
        while idx < lines.len() && !FENCE_CLOSE_RE.is_match(lines[idx]) {
            body.push(lines[idx]);
            idx += 1;
        }
        // Skip the closing fence; an unterminated fence has already hit EOF.
        idx += 1;

        let content = body.join("\n");
        if !code_is_empty(&content, &language) {
            blocks.push(Block::Code(CodeBlock::new(
                content,
                language,
                attrs.hidden,
                fence_line + 2,
            )));
        }
    }

    flush_markdown(&mut blocks, &mut prose, prose_start);
    Document::new(blocks, metadata)
}

fn flush_markdown(blocks: &mut Vec<Block>, prose: &mut Vec<&str>, start: usize) {
    if let Some((content, line)) = trim_blank_lines(prose, start) {
        blocks.push(Block::Markdown(MarkdownBlock::new(content, line)));
    }
    prose.clear();
}
