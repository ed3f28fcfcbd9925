//! Commented-Python front end.
//!
//! A plain Python script where prose lives in `#'` comment lines and
//! everything else is code. `#| hide` ... `#|` wraps code that runs but is
//! not shown.

use lectern_core::{
    Block, CodeBlock, Document, DocumentMetadata, MarkdownBlock, EXECUTABLE_LANGUAGE,
};

use crate::frontmatter::{self, commented_text};
use crate::{code_is_empty, trim_blank_lines};

/// `#| hide`, with any spacing after the sentinel.
fn is_hide_open(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("#|")
        .is_some_and(|rest| rest.trim() == "hide")
}

fn is_hide_close(trimmed: &str) -> bool {
    trimmed == "#|"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Markdown,
    Code,
}

/// Line state machine that accretes runs and flushes them as blocks.
struct LiterateParser<'a> {
    blocks: Vec<Block>,
    pending: Vec<&'a str>,
    run: Run,
    run_start: usize,
    in_hidden: bool,
}

impl<'a> LiterateParser<'a> {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            pending: Vec::new(),
            run: Run::Markdown,
            run_start: 0,
            in_hidden: false,
        }
    }

    fn feed(&mut self, idx: usize, line: &'a str) {
        let trimmed = line.trim();

        if self.in_hidden && is_hide_close(trimmed) {
            self.flush();
            self.in_hidden = false;
            return;
        }
        if !self.in_hidden && is_hide_open(trimmed) {
            self.flush();
            self.in_hidden = true;
            return;
        }

        match commented_text(line) {
            Some(text) => self.push(Run::Markdown, idx, text),
            None => self.push(Run::Code, idx, line),
        }
    }

    fn push(&mut self, run: Run, idx: usize, text: &'a str) {
        if self.run != run {
            self.flush();
            self.run = run;
        }
        if self.pending.is_empty() {
            self.run_start = idx;
        }
        self.pending.push(text);
    }

    fn flush(&mut self) {
        if let Some((content, line)) = trim_blank_lines(&self.pending, self.run_start) {
            match self.run {
                Run::Markdown => {
                    self.blocks
                        .push(Block::Markdown(MarkdownBlock::new(content, line)));
                }
                Run::Code if !code_is_empty(&content, EXECUTABLE_LANGUAGE) => {
                    self.blocks.push(Block::Code(CodeBlock::new(
                        content,
                        EXECUTABLE_LANGUAGE,
                        self.in_hidden,
                        line,
                    )));
                }
                Run::Code => {}
            }
        }
        self.pending.clear();
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Parse a commented Python script into a [`Document`].
pub fn parse(text: &str) -> Document {
    let lines: Vec<&str> = text.lines().collect();

    let (metadata, start) = match frontmatter::split_commented(&lines) {
        Some(fm) => (fm.metadata, fm.consumed_lines),
        None => (DocumentMetadata::default(), 0),
    };

    let mut parser = LiterateParser::new();
    for (idx, line) in lines.iter().copied().enumerate().skip(start) {
        parser.feed(idx, line);
    }

    Document::new(parser.finish(), metadata)
}
