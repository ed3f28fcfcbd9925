//! Document metadata parsed from frontmatter.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::enums::OutputFormat;
use crate::error::{LecternError, Result};

/// Default DPI for saved figures.
pub const DEFAULT_PLOT_DPI: u32 = 100;

/// Default (advisory) number format.
pub const DEFAULT_NUMBER_FORMAT: &str = ".4f";

/// Typed view over the frontmatter, with the full mapping kept in `raw`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Output format declared by the document
    pub output: OutputFormat,
    /// DPI for saved figures
    pub plot_dpi: u32,
    /// Number format; carried through, not applied by the executor
    pub number_format: String,
    /// Directory to run code in
    pub working_dir: Option<String>,
    /// Syntax highlighting theme for HTML output
    pub code_theme: Option<String>,
    /// Append the attribution footer to HTML output
    pub show_footer: bool,
    /// Every frontmatter key, recognized or not
    pub raw: Mapping,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            output: OutputFormat::Markdown,
            plot_dpi: DEFAULT_PLOT_DPI,
            number_format: DEFAULT_NUMBER_FORMAT.to_string(),
            working_dir: None,
            code_theme: None,
            show_footer: true,
            raw: Mapping::new(),
        }
    }
}

impl DocumentMetadata {
    /// Parse a YAML frontmatter body.
    ///
    /// An empty body yields defaults. A body that is not a mapping is an
    /// error; callers that want silent degradation fall back themselves.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)
            .map_err(|e| LecternError::Parse(format!("frontmatter: {}", e)))?;
        match value {
            Value::Null => Ok(Self::default()),
            Value::Mapping(map) => Ok(Self::from_mapping(map)),
            other => Err(LecternError::Parse(format!(
                "frontmatter must be a mapping, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Build metadata from an already parsed mapping.
    pub fn from_mapping(map: Mapping) -> Self {
        let mut metadata = Self::default();
        for (key, value) in &map {
            if let Some(key) = key.as_str() {
                metadata.set_typed(key, value);
            }
        }
        metadata.raw = map;
        metadata
    }

    /// Override a single key, updating both the typed field and `raw`.
    pub fn set(&mut self, key: &str, value: Value) {
        self.set_typed(key, &value);
        self.raw.insert(Value::String(key.to_string()), value);
    }

    fn set_typed(&mut self, key: &str, value: &Value) {
        match key {
            "title" => self.title = scalar_string(value),
            "output" => {
                self.output = scalar_string(value)
                    .map(|s| OutputFormat::from_name(&s))
                    .unwrap_or_default()
            }
            "plot_dpi" => {
                if let Some(dpi) = value.as_u64().and_then(|n| u32::try_from(n).ok()) {
                    self.plot_dpi = dpi;
                }
            }
            "number_format" => {
                if let Some(s) = scalar_string(value) {
                    self.number_format = s;
                }
            }
            "working_dir" => self.working_dir = scalar_string(value),
            "code_theme" => self.code_theme = scalar_string(value),
            "show_footer" => {
                if let Some(flag) = value.as_bool() {
                    self.show_footer = flag;
                }
            }
            _ => {}
        }
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
