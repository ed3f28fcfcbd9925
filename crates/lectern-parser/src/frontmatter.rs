//! YAML frontmatter detection for both front ends.
//!
//! A frontmatter region is only recognized at the very top of a document.
//! Whatever it consumes is excluded from block parsing.

use lectern_core::DocumentMetadata;
use log::debug;

/// The delimiter line, after any comment sentinel has been removed.
const DELIMITER: &str = "---";

/// A recognized frontmatter region.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter {
    /// Parsed metadata (defaults if the body was unusable)
    pub metadata: DocumentMetadata,
    /// Number of leading lines the region occupies, delimiters included
    pub consumed_lines: usize,
}

/// Detect `---` frontmatter at the first line of a fenced document.
///
/// Without a closing delimiter nothing is consumed.
pub fn split_fenced(lines: &[&str]) -> Option<Frontmatter> {
    if lines.first().map(|l| l.trim_end()) != Some(DELIMITER) {
        return None;
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|l| l.trim_end() == DELIMITER)?
        + 1;

    let body = lines[1..close].join("\n");
    Some(Frontmatter {
        metadata: metadata_from_body(&body),
        consumed_lines: close + 1,
    })
}

/// Detect `#' ---` frontmatter in a commented document.
///
/// The region must start at the first non-blank line and every line up to
/// the closing `#' ---` must itself be a `#'` line.
pub fn split_commented(lines: &[&str]) -> Option<Frontmatter> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    if commented_text(lines[start]).map(str::trim) != Some(DELIMITER) {
        return None;
    }

    let mut body = Vec::new();
    for (offset, line) in lines[start + 1..].iter().enumerate() {
        let text = commented_text(line)?;
        if text.trim() == DELIMITER {
            return Some(Frontmatter {
                metadata: metadata_from_body(&body.join("\n")),
                consumed_lines: start + offset + 2,
            });
        }
        body.push(text);
    }

    None
}

/// Text of a `#'` line with the sentinel and one following blank removed.
pub fn commented_text(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("#'")?;
    Some(
        rest.strip_prefix(' ')
            .or_else(|| rest.strip_prefix('\t'))
            .unwrap_or(rest),
    )
}

/// Parse a frontmatter body, degrading silently to defaults.
pub fn metadata_from_body(body: &str) -> DocumentMetadata {
    match DocumentMetadata::from_yaml(body) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Ignoring frontmatter: {}", e);
            DocumentMetadata::default()
        }
    }
}
