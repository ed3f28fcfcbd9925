//! Lectern Syntax
//!
//! Syntax highlighting for code blocks in HTML reports, using syntect.
//!
//! # Features
//!
//! - **Language aliases** - Map fence tags (py, sh, yml) to syntect syntaxes
//! - **Theme validation** - Unknown theme names fail with a suggestion
//! - **Class-based HTML** - Spans carry `hl-` prefixed classes, styled by
//!   the CSS generated for the chosen theme
//!
//! # Example
//!
//! ```
//! use lectern_syntax::Highlighter;
//!
//! let highlighter = Highlighter::new();
//! let html = highlighter.highlight_html("x = 1\n", "python");
//! assert!(html.contains("hl-"));
//! ```

mod languages;

pub use languages::{aliases_for, language_alias, LANGUAGE_ALIASES};

use lectern_core::{LecternError, Result};
use log::debug;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Theme used when neither the document nor the config names one.
pub const DEFAULT_THEME: &str = "InspiredGitHub";

/// Class prefix on every highlighted span.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Syntax highlighter for code blocks.
pub struct Highlighter {
    /// Syntax definitions
    syntax_set: SyntaxSet,
    /// Color themes
    theme_set: ThemeSet,
    /// Current theme name, always present in `theme_set`
    theme_name: String,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("theme_name", &self.theme_name)
            .finish()
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Create a highlighter with the default theme (InspiredGitHub).
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: DEFAULT_THEME.to_string(),
        }
    }

    /// Create a highlighter for a named theme, validating the name.
    pub fn with_theme(theme_name: &str) -> Result<Self> {
        let mut highlighter = Self::new();
        highlighter.set_theme(theme_name)?;
        Ok(highlighter)
    }

    /// Switch themes; unknown names leave the current theme in place.
    pub fn set_theme(&mut self, theme_name: &str) -> Result<()> {
        self.theme_name = resolve_theme(&self.theme_set, theme_name)?;
        Ok(())
    }

    /// Get the current theme name.
    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    /// Get the current theme.
    pub fn theme(&self) -> Result<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| unknown_theme(&self.theme_set, &self.theme_name))
    }

    /// Find syntax definition for a language tag.
    ///
    /// Aliases are tried first, then syntect's own name, token and
    /// extension matching.
    pub fn syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.trim().is_empty() {
            return None;
        }
        let canonical = language_alias(language);

        self.syntax_set
            .find_syntax_by_name(canonical)
            .or_else(|| self.syntax_set.find_syntax_by_token(canonical))
            .or_else(|| self.syntax_set.find_syntax_by_extension(canonical))
            .or_else(|| self.syntax_set.find_syntax_by_token(language))
    }

    /// Get the plain text syntax (for unknown languages).
    pub fn plain_text(&self) -> &SyntaxReference {
        self.syntax_set.find_syntax_plain_text()
    }

    /// Highlight `code` as a run of classed `<span>`s.
    ///
    /// The result is meant for the inside of a `<pre>`; it is already HTML
    /// escaped. Unknown languages are emitted as escaped plain text.
    pub fn highlight_html(&self, code: &str, language: &str) -> String {
        let syntax = self.syntax_for_language(language).unwrap_or_else(|| {
            debug!("No syntax for '{}', using plain text", language);
            self.plain_text()
        });

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                debug!("Highlighting '{}' failed: {}", language, e);
                return escape_html(code);
            }
        }
        generator.finalize()
    }

    /// Stylesheet for the current theme's classes.
    pub fn css(&self) -> Result<String> {
        css_for_theme_with_class_style(self.theme()?, CLASS_STYLE)
            .map_err(|e| LecternError::Render(format!("theme CSS: {}", e)))
    }

    /// List available theme names, sorted.
    pub fn themes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.theme_set.themes.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// List available language names.
    pub fn languages(&self) -> Vec<&str> {
        self.syntax_set
            .syntaxes()
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Check if a theme exists.
    pub fn has_theme(&self, name: &str) -> bool {
        self.theme_set.themes.contains_key(name)
    }

    /// Check if a language is supported.
    pub fn has_language(&self, name: &str) -> bool {
        self.syntax_for_language(name).is_some()
    }
}

/// Validate a theme name against a theme set.
///
/// Returns the exact name on success. Failures carry a hint: themes whose
/// names contain the request (or vice versa, case-insensitively), or the
/// full list.
pub fn resolve_theme(theme_set: &ThemeSet, name: &str) -> Result<String> {
    if theme_set.themes.contains_key(name) {
        return Ok(name.to_string());
    }
    Err(unknown_theme(theme_set, name))
}

fn unknown_theme(theme_set: &ThemeSet, name: &str) -> LecternError {
    let wanted = name.to_lowercase();
    let mut available: Vec<&str> = theme_set.themes.keys().map(|s| s.as_str()).collect();
    available.sort_unstable();

    let similar: Vec<&str> = available
        .iter()
        .copied()
        .filter(|t| {
            let t = t.to_lowercase();
            !wanted.is_empty() && (t.contains(&wanted) || wanted.contains(&t))
        })
        .collect();

    let suggestion = if similar.is_empty() {
        format!(" Available themes: {}", available.join(", "))
    } else {
        format!(" Did you mean: {}?", similar.join(", "))
    };

    LecternError::Theme {
        name: name.to_string(),
        suggestion,
    }
}

/// Minimal HTML escaping for text content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_highlighter() {
        let h = Highlighter::new();
        assert_eq!(h.theme_name(), "InspiredGitHub");
        assert!(h.theme().is_ok());
    }

    #[test]
    fn test_with_theme() {
        let h = Highlighter::with_theme("Solarized (dark)").unwrap();
        assert_eq!(h.theme_name(), "Solarized (dark)");
    }

    #[test]
    fn test_unknown_theme_lists_available() {
        let err = Highlighter::with_theme("invalid-theme-xyz").unwrap_err();
        match err {
            LecternError::Theme { name, suggestion } => {
                assert_eq!(name, "invalid-theme-xyz");
                assert!(suggestion.contains("Available themes"));
                assert!(suggestion.contains("InspiredGitHub"));
            }
            other => panic!("expected theme error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_theme_suggests_similar() {
        let err = Highlighter::with_theme("solarized").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Did you mean"));
        assert!(msg.contains("Solarized (dark)"));
    }

    #[test]
    fn test_set_theme_keeps_current_on_error() {
        let mut h = Highlighter::new();
        assert!(h.set_theme("nope").is_err());
        assert_eq!(h.theme_name(), DEFAULT_THEME);
    }

    #[test]
    fn test_syntax_for_language() {
        let h = Highlighter::new();
        assert!(h.syntax_for_language("Python").is_some());
        assert!(h.syntax_for_language("py").is_some());
        assert!(h.syntax_for_language("rust").is_some());
        assert!(h.syntax_for_language("sh").is_some());
        assert!(h.syntax_for_language("").is_none());
        assert!(h.syntax_for_language("unknown-lang-xyz").is_none());
    }

    #[test]
    fn test_highlight_html_python() {
        let h = Highlighter::new();
        let html = h.highlight_html("def f(x):\n    return x < 1\n", "python");
        assert!(html.contains("<span class=\"hl-"));
        assert!(html.contains("&lt;"));
        assert!(!html.contains("x < 1"));
    }

    #[test]
    fn test_highlight_html_unknown_language() {
        let h = Highlighter::new();
        let html = h.highlight_html("a <b> c\n", "unknown-lang-xyz");
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_css_uses_prefix() {
        let h = Highlighter::new();
        let css = h.css().unwrap();
        assert!(css.contains(".hl-"));
    }

    #[test]
    fn test_themes_sorted() {
        let h = Highlighter::new();
        let themes = h.themes();
        assert!(themes.contains(&"InspiredGitHub"));
        let mut sorted = themes.clone();
        sorted.sort_unstable();
        assert_eq!(themes, sorted);
    }

    #[test]
    fn test_has_language() {
        let h = Highlighter::new();
        assert!(h.has_language("python"));
        assert!(h.has_language("yml"));
        assert!(!h.has_language("nonexistent"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
