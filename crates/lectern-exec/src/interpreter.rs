//! The seam between the engine and a live interpreter.
//!
//! Two failure channels are kept apart. The outer [`lectern_core::Result`]
//! reports that the session itself is broken (process gone, protocol
//! garbage). The inner `Result<T, ExecError>` of an [`Outcome`] reports that
//! user code raised.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lectern_core::{LecternError, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scope::ScriptScope;

/// Exception kinds that mean "this is not valid code in this position".
const SYNTAX_ERROR_KINDS: &[&str] = &["SyntaxError", "IndentationError", "TabError"];

/// How an evaluated value is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// `repr(value)`, used for auto-display
    Repr,
    /// `str(value)`, used for inline substitution
    Str,
}

/// An exception raised by user code.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ExecError {
    /// Exception type name, e.g. `NameError`
    pub kind: String,
    /// `str(exception)`
    pub message: String,
}

impl ExecError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// SyntaxError and its subclasses.
    pub fn is_syntax_error(&self) -> bool {
        SYNTAX_ERROR_KINDS.contains(&self.kind.as_str())
    }
}

impl From<LecternError> for ExecError {
    fn from(err: LecternError) -> Self {
        ExecError::new("InterpreterError", err.to_string())
    }
}

/// The result of one interpreter request plus whatever it printed.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub value: std::result::Result<T, ExecError>,
    pub stdout: String,
    pub stderr: String,
}

impl<T> Outcome<T> {
    /// A successful outcome with no captured output.
    pub fn ok(value: T) -> Self {
        Self {
            value: Ok(value),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// A failed outcome with no captured output.
    pub fn err(error: ExecError) -> Self {
        Self {
            value: Err(error),
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    /// Attach captured stdout.
    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// A stateful interpreter holding one namespace.
///
/// All calls run against the same namespace, in call order.
pub trait Interpreter {
    /// Whether `code` compiles as a single expression.
    fn is_expression(&mut self, code: &str) -> Result<bool>;

    /// Evaluate an expression. `None` means the value was Python's `None`.
    fn evaluate(&mut self, code: &str, mode: ValueMode) -> Result<Outcome<Option<String>>>;

    /// Execute statements.
    fn execute(&mut self, code: &str) -> Result<Outcome<()>>;

    /// Replace the namespace with a fresh `__main__` one and close any
    /// open figures. Called before each document run.
    fn reset(&mut self) -> Result<()>;

    /// Install script identity, `sys.path`, `sys.argv` and working directory.
    fn enter_scope(&mut self, scope: &ScriptScope) -> Result<()>;

    /// Undo the most recent [`Interpreter::enter_scope`].
    fn leave_scope(&mut self) -> Result<()>;

    /// Close every open figure.
    fn clear_figures(&mut self) -> Result<()>;

    /// Save open figures as `figure_<n>.png` in `dir`, numbering from
    /// `start`, then close them.
    fn save_figures(&mut self, dir: &Path, start: usize, dpi: u32) -> Result<Outcome<Vec<PathBuf>>>;

    /// Current user bindings, name to short repr.
    fn namespace(&mut self) -> Result<BTreeMap<String, String>>;
}
