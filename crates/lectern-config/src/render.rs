//! Output settings, the `[render]` table.

use serde::{Deserialize, Serialize};

use lectern_core::OutputFormat;

/// Settings that shape the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RenderConfig {
    /// Output format for every document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,

    /// Highlighting theme for HTML output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_theme: Option<String>,

    /// Append the attribution footer to HTML output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_footer: Option<bool>,
}

impl RenderConfig {
    /// Merge another RenderConfig into this one; set fields win.
    pub fn merge(&mut self, other: &RenderConfig) {
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.code_theme.is_some() {
            self.code_theme = other.code_theme.clone();
        }
        if other.show_footer.is_some() {
            self.show_footer = other.show_footer;
        }
    }
}
