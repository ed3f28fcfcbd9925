//! Inline expression markers inside markdown prose.
//!
//! `<%= expr %>` is replaced by the value of `expr`; `<% stmt %>` runs
//! `stmt` and disappears. Markers are found in one left-to-right scan and
//! never nest.

use std::collections::HashMap;
use std::sync::LazyLock;

use lectern_core::InlineExpression;
use regex::{Captures, Regex};

/// Marker pattern; group 1 is the `=` of a value marker, group 2 the code.
static INLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<%(=)?\s*(.*?)\s*%>").unwrap());

/// Find every marker in `text`, in order.
pub fn extract_inline(text: &str) -> Vec<InlineExpression> {
    INLINE_RE
        .captures_iter(text)
        .map(|caps| InlineExpression {
            expression: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            is_statement: caps.get(1).is_none(),
            position: caps.get(0).map_or(0, |m| m.start()),
        })
        .collect()
}

/// Whether `text` contains at least one marker.
pub fn has_inline(text: &str) -> bool {
    INLINE_RE.is_match(text)
}

/// Rebuild `text` with markers replaced by position.
///
/// `replacements` maps a marker's byte offset to its replacement text.
/// Markers without an entry are kept verbatim.
pub fn substitute(text: &str, replacements: &HashMap<usize, String>) -> String {
    INLINE_RE
        .replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            replacements
                .get(&start)
                .cloned()
                .unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

/// Rewrite value markers into `{expr}` placeholders, for formats that have
/// no notion of inline execution. Statement markers are left untouched.
pub fn to_placeholders(text: &str) -> String {
    INLINE_RE
        .replace_all(text, |caps: &Captures| {
            let code = caps.get(2).map_or("", |m| m.as_str());
            if caps.get(1).is_some() {
                format!("{{{}}}", code)
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
