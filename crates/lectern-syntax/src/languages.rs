//! Language tag aliases.
//!
//! Fence tags in reports are short and inconsistent (`py`, `sh`, `yml`).
//! Each group below lists the syntect syntax name first, then the tags
//! that should resolve to it.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Syntax name followed by its lowercase aliases.
const ALIAS_GROUPS: &[(&str, &[&str])] = &[
    ("Python", &["python", "py", "python3", "py3", "ipython", "pycon"]),
    ("R", &["r", "rscript", "rlang"]),
    ("Julia", &["julia", "jl"]),
    ("SQL", &["sql", "sqlite", "postgres", "postgresql", "mysql"]),
    (
        "Bourne Again Shell (bash)",
        &["bash", "sh", "shell", "zsh", "console", "shell-session"],
    ),
    ("JavaScript", &["javascript", "js", "node", "mjs"]),
    ("Rust", &["rust", "rs"]),
    ("C", &["c", "h"]),
    ("C++", &["cpp", "c++", "cxx", "hpp"]),
    ("Go", &["go", "golang"]),
    ("Java", &["java"]),
    ("Scala", &["scala"]),
    ("Haskell", &["haskell", "hs"]),
    ("Lua", &["lua"]),
    ("Ruby", &["ruby", "rb"]),
    ("Perl", &["perl", "pl"]),
    ("JSON", &["json", "jsonc", "geojson", "ipynb"]),
    ("YAML", &["yaml", "yml"]),
    ("XML", &["xml", "svg"]),
    ("HTML", &["html", "htm"]),
    ("CSS", &["css"]),
    ("Markdown", &["markdown", "md"]),
    ("LaTeX", &["latex", "tex"]),
    ("Makefile", &["makefile", "make", "mk"]),
    ("Diff", &["diff", "patch"]),
    ("Batch File", &["batch", "bat", "cmd"]),
    ("Regular Expression", &["regex", "regexp"]),
    ("Plain Text", &["text", "txt", "plain", "output"]),
];

/// Flattened alias to syntax name map.
pub static LANGUAGE_ALIASES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    ALIAS_GROUPS
        .iter()
        .flat_map(|(syntax, aliases)| aliases.iter().map(move |alias| (*alias, *syntax)))
        .collect()
});

/// Resolve a fence tag to a syntect syntax name.
///
/// Unknown tags are returned unchanged.
///
/// ```
/// use lectern_syntax::language_alias;
///
/// assert_eq!(language_alias("py"), "Python");
/// assert_eq!(language_alias("yml"), "YAML");
/// assert_eq!(language_alias("brainfuck"), "brainfuck");
/// ```
pub fn language_alias(name: &str) -> &str {
    let lower = name.trim().to_lowercase();
    LANGUAGE_ALIASES
        .get(lower.as_str())
        .copied()
        .unwrap_or(name)
}

/// All tags that resolve to `syntax_name`.
pub fn aliases_for(syntax_name: &str) -> Vec<&'static str> {
    ALIAS_GROUPS
        .iter()
        .find(|(syntax, _)| *syntax == syntax_name)
        .map(|(_, aliases)| aliases.to_vec())
        .unwrap_or_default()
}
