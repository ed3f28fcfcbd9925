//! Lectern Config
//!
//! This crate handles configuration loading and management
//! for lectern, supporting TOML configuration files.
//!
//! # Overview
//!
//! Configuration is loaded from platform-specific locations:
//! - Linux: `~/.config/lectern/config.toml`
//! - macOS: `~/Library/Application Support/lectern/config.toml`
//! - Windows: `%APPDATA%\lectern\config.toml`
//!
//! Values found in config files take precedence over document frontmatter.
//! Command-line flags, applied by the binary, take precedence over both.
//!
//! # Example
//!
//! ```no_run
//! use lectern_config::Config;
//!
//! // Load config with defaults
//! let config = Config::load().unwrap();
//!
//! // Or load with an override file
//! let config = Config::load_with_override(Some("./lectern.toml")).unwrap();
//! ```

mod execution;
mod render;

pub use execution::{ExecutionConfig, DEFAULT_PYTHON};
pub use render::RenderConfig;

use std::path::{Path, PathBuf};

use lectern_core::{DocumentMetadata, LecternError, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// Default TOML configuration string.
const DEFAULT_TOML: &str = r#"# Lectern configuration.
#
# Values set here override document frontmatter.
# Command-line flags override both.

[execution]
Python = "python3"
# Timeout    = 60.0
# WorkingDir = "/path/to/data"

[render]
# Format     = "html"
# CodeTheme  = "InspiredGitHub"
# ShowFooter = true

[metadata]
# Any frontmatter key, applied to every document.
# plot_dpi = 150
"#;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interpreter settings
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Output settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Frontmatter overrides, keyed like frontmatter
    #[serde(default)]
    pub metadata: toml::Table,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            execution: ExecutionConfig {
                python: Some(DEFAULT_PYTHON.to_string()),
                ..Default::default()
            },
            render: RenderConfig::default(),
            metadata: toml::Table::new(),
        }
    }
}

impl Config {
    /// Returns the default TOML configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use lectern_config::Config;
    /// let toml = Config::default_toml();
    /// assert!(toml.contains("[execution]"));
    /// assert!(toml.contains("[render]"));
    /// ```
    pub fn default_toml() -> &'static str {
        DEFAULT_TOML
    }

    /// Returns the platform-specific configuration file path.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns the platform-specific configuration directory.
    pub fn config_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lectern")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Ensures the config file exists, creating it with defaults if not.
    ///
    /// Returns the path to the config file.
    pub fn ensure_config_file() -> Result<PathBuf> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| LecternError::Config("Could not determine config directory".into()))?;

        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            std::fs::write(&config_path, DEFAULT_TOML)?;
        }

        Ok(config_path)
    }

    /// Load configuration from the default platform-specific path.
    ///
    /// If no config file exists, returns the default configuration.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                debug!("Loading config from {}", config_path.display());
                config.merge(&Self::load_from(&config_path)?);
            }
        }
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LecternError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| LecternError::Config(format!("Parse error in {}: {}", path.display(), e)))
    }

    /// Load configuration with an optional override file or string.
    ///
    /// 1. Load the base config from the default location
    /// 2. If `override_config` is provided:
    ///    - If it's a path to an existing file, load and merge it
    ///    - Otherwise, treat it as a TOML string and parse it
    ///
    /// ```no_run
    /// use lectern_config::Config;
    ///
    /// let config = Config::load_with_override(Some("[render]\nFormat = \"html\"")).unwrap();
    /// ```
    pub fn load_with_override(override_config: Option<&str>) -> Result<Self> {
        let mut config = Self::load()?;

        if let Some(override_str) = override_config {
            config.merge(&Self::parse_override(override_str)?);
        }

        Ok(config)
    }

    /// Parse an override given as a file path or inline TOML.
    ///
    /// A string that looks like a path to a `.toml` file but does not exist
    /// is reported as missing rather than parsed as TOML.
    pub fn parse_override(override_str: &str) -> Result<Self> {
        let override_path = Path::new(override_str);

        if override_path.exists() {
            return Self::load_from(override_path);
        }
        if override_str.trim_end().ends_with(".toml") && !override_str.contains('\n') {
            return Err(LecternError::NotFound(override_path.to_path_buf()));
        }

        toml::from_str(override_str)
            .map_err(|e| LecternError::Config(format!("Override parse error: {}", e)))
    }

    /// Merge another config into this one.
    ///
    /// Values set in `other` take precedence over values in `self`.
    ///
    /// # Example
    ///
    /// ```
    /// use lectern_config::Config;
    ///
    /// let mut base = Config::default();
    /// let override_config: Config = toml::from_str(r#"
    ///     [execution]
    ///     Python = "python3.12"
    /// "#).unwrap();
    ///
    /// base.merge(&override_config);
    /// assert_eq!(base.execution.python(), "python3.12");
    /// ```
    pub fn merge(&mut self, other: &Config) {
        self.execution.merge(&other.execution);
        self.render.merge(&other.render);
        for (key, value) in &other.metadata {
            self.metadata.insert(key.clone(), value.clone());
        }
    }

    /// Save configuration to a file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| LecternError::Config(format!("Serialization error: {}", e)))?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Apply config-level overrides to a document's metadata.
    ///
    /// The `[metadata]` table is applied first, then `[render]` and
    /// `[execution].WorkingDir`, which are more specific.
    pub fn apply_to_metadata(&self, metadata: &mut DocumentMetadata) -> Result<()> {
        for (key, value) in &self.metadata {
            let value = serde_yaml::to_value(value).map_err(|e| {
                LecternError::Config(format!("metadata override '{}': {}", key, e))
            })?;
            debug!("Config overrides metadata key '{}'", key);
            metadata.set(key, value);
        }

        if let Some(format) = self.render.format {
            metadata.set("output", serde_yaml::Value::String(format.to_string()));
        }
        if let Some(theme) = &self.render.code_theme {
            metadata.set("code_theme", serde_yaml::Value::String(theme.clone()));
        }
        if let Some(show) = self.render.show_footer {
            metadata.set("show_footer", serde_yaml::Value::Bool(show));
        }
        if let Some(dir) = &self.execution.working_dir {
            metadata.set(
                "working_dir",
                serde_yaml::Value::String(dir.to_string_lossy().into_owned()),
            );
        }
        Ok(())
    }
}
