//! Execution settings.
//!
//! This module contains the `ExecutionConfig` struct, the `[execution]`
//! table of the config file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Interpreter used when nothing else is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// Settings for running a document's code.
///
/// Every field is optional so that an override file only replaces what it
/// names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExecutionConfig {
    /// Python executable to start the session with.
    /// Default: "python3"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python: Option<String>,

    /// Per-run timeout in seconds. Accepted but not enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    /// Directory to run code in when the document names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

impl ExecutionConfig {
    /// The interpreter to start, falling back to `python3`.
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or(DEFAULT_PYTHON)
    }

    /// Merge another ExecutionConfig into this one.
    ///
    /// Only fields set in `other` are copied.
    pub fn merge(&mut self, other: &ExecutionConfig) {
        if other.python.is_some() {
            self.python = other.python.clone();
        }
        if other.timeout.is_some() {
            self.timeout = other.timeout;
        }
        if other.working_dir.is_some() {
            self.working_dir = other.working_dir.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_fallback() {
        let config = ExecutionConfig::default();
        assert_eq!(config.python(), "python3");

        let config = ExecutionConfig {
            python: Some("/opt/py/bin/python".into()),
            ..Default::default()
        };
        assert_eq!(config.python(), "/opt/py/bin/python");
    }

    #[test]
    fn test_merge_only_set_fields() {
        let mut base = ExecutionConfig {
            python: Some("python3.12".into()),
            timeout: Some(10.0),
            working_dir: None,
        };
        let other = ExecutionConfig {
            python: None,
            timeout: Some(30.0),
            working_dir: Some(PathBuf::from("data")),
        };

        base.merge(&other);
        assert_eq!(base.python.as_deref(), Some("python3.12"));
        assert_eq!(base.timeout, Some(30.0));
        assert_eq!(base.working_dir, Some(PathBuf::from("data")));
    }

    #[test]
    fn test_pascal_case_keys() {
        let config: ExecutionConfig =
            toml::from_str("Python = \"python3.11\"\nTimeout = 5.5\nWorkingDir = \"/tmp\"").unwrap();
        assert_eq!(config.python(), "python3.11");
        assert_eq!(config.timeout, Some(5.5));
        assert_eq!(config.working_dir, Some(PathBuf::from("/tmp")));
    }
}
