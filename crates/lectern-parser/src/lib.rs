//! Lectern Parser
//!
//! Turns source text into the ordered block model of [`lectern_core`].
//!
//! # Overview
//!
//! Two front ends produce the same [`Document`]:
//!
//! - [`fenced`] - Markdown with ```` ```python ```` fences and `---` frontmatter
//! - [`literate`] - Python scripts with `#'` prose lines and `#| hide` regions
//!
//! [`inline`] finds `<%= expr %>` / `<% stmt %>` markers inside prose.
//!
//! # Example
//!
//! ```
//! use lectern_parser::{parse, SourceSyntax};
//!
//! let doc = parse("# Title\n\n```python\nx = 1\n```\n", SourceSyntax::Fenced);
//! assert_eq!(doc.blocks.len(), 2);
//! ```

pub mod fenced;
pub mod frontmatter;
pub mod inline;
pub mod literate;

pub use fenced::FenceAttributes;
pub use frontmatter::Frontmatter;
pub use inline::{extract_inline, has_inline, substitute, to_placeholders};

use std::path::Path;

use lectern_core::{Document, LecternError, Result, EXECUTABLE_LANGUAGE};
use log::{debug, info};

/// Which front end a source uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSyntax {
    /// Markdown with fenced code blocks
    Fenced,
    /// Python with `#'` prose comments
    Commented,
}

impl SourceSyntax {
    /// Pick a front end from the file extension, then from the content.
    pub fn detect(path: Option<&Path>, text: &str) -> Self {
        let is_py = path
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("py"));

        if is_py || text.lines().any(|l| frontmatter::commented_text(l).is_some()) {
            SourceSyntax::Commented
        } else {
            SourceSyntax::Fenced
        }
    }
}

impl std::fmt::Display for SourceSyntax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSyntax::Fenced => write!(f, "fenced markdown"),
            SourceSyntax::Commented => write!(f, "commented python"),
        }
    }
}

/// Parse `text` with the given front end.
pub fn parse(text: &str, syntax: SourceSyntax) -> Document {
    let doc = match syntax {
        SourceSyntax::Fenced => fenced::parse(text),
        SourceSyntax::Commented => literate::parse(text),
    };
    debug!("Parsed {} block(s) as {}", doc.blocks.len(), syntax);
    doc
}

/// Parse with the front end chosen by [`SourceSyntax::detect`].
pub fn parse_auto(text: &str, path: Option<&Path>) -> Document {
    let doc = parse(text, SourceSyntax::detect(path, text));
    match path {
        Some(p) => doc.with_source_path(p),
        None => doc,
    }
}

/// Read and parse a document from disk.
pub fn parse_file(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(LecternError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    info!("Parsing {}", path.display());
    Ok(parse_auto(&text, Some(path)))
}

/// Whether a code body has nothing worth keeping.
///
/// Python bodies made only of blank and `#` comment lines are empty; any
/// other language is empty only when whitespace-only.
pub fn code_is_empty(content: &str, language: &str) -> bool {
    if language.eq_ignore_ascii_case(EXECUTABLE_LANGUAGE) {
        content.lines().all(|l| {
            let t = l.trim();
            t.is_empty() || t.starts_with('#')
        })
    } else {
        content.trim().is_empty()
    }
}

/// Drop leading and trailing blank lines.
///
/// Returns the joined text and the 1-based line number of its first line,
/// given the 0-based index of `lines[0]`; `None` when nothing is left.
pub(crate) fn trim_blank_lines(lines: &[&str], first_index: usize) -> Option<(String, usize)> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some((lines[start..=end].join("\n"), first_index + start + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::BlockKind;
    use std::path::PathBuf;

    #[test]
    fn test_detect_by_extension() {
        let path = PathBuf::from("analysis.py");
        assert_eq!(
            SourceSyntax::detect(Some(&path), "x = 1"),
            SourceSyntax::Commented
        );
        let path = PathBuf::from("report.md");
        assert_eq!(
            SourceSyntax::detect(Some(&path), "# Title"),
            SourceSyntax::Fenced
        );
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            SourceSyntax::detect(None, "#' # Title\nx = 1"),
            SourceSyntax::Commented
        );
        assert_eq!(SourceSyntax::detect(None, "# Title"), SourceSyntax::Fenced);
    }

    #[test]
    fn test_parse_auto_sets_source_path() {
        let path = PathBuf::from("doc.md");
        let doc = parse_auto("# Hi\n", Some(&path));
        assert_eq!(doc.source_path, Some(path));
        assert_eq!(doc.kinds(), vec![BlockKind::Markdown]);
    }

    #[test]
    fn test_parse_file_missing() {
        let err = parse_file(Path::new("definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, LecternError::NotFound(_)));
    }

    #[test]
    fn test_code_is_empty() {
        assert!(code_is_empty("# only\n\n  # comments", "python"));
        assert!(code_is_empty("# only", "Python"));
        assert!(!code_is_empty("x = 1 # trailing", "python"));
        assert!(!code_is_empty("// comment", "javascript"));
        assert!(!code_is_empty("# shell", "bash"));
        assert!(code_is_empty("  \n\t", "rust"));
    }

    #[test]
    fn test_trim_blank_lines() {
        assert_eq!(
            trim_blank_lines(&["", "a", "", "b", "  "], 10),
            Some(("a\n\nb".to_string(), 12))
        );
        assert_eq!(trim_blank_lines(&["", "  "], 0), None);
        assert_eq!(trim_blank_lines(&[], 0), None);
    }
}
