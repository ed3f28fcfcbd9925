//! Lectern Exec
//!
//! This crate runs the Python code of a parsed document, in order, against
//! one namespace shared by all of that document's blocks.
//!
//! # Overview
//!
//! The exec crate provides:
//! - [`Interpreter`] - The seam to a stateful interpreter
//! - [`PythonSession`] - A long-lived `python3` worker speaking NDJSON
//! - [`Executor`] - Walks a document and fills in outputs, errors and figures
//! - [`run_block`] - Notebook-style auto-display for a single block
//! - [`resolve_inline`] - Inline marker substitution in prose
//!
//! # Example
//!
//! ```no_run
//! use lectern_exec::{execute, ExecutorOptions};
//! use lectern_parser::{parse, SourceSyntax};
//!
//! let doc = parse("```python\nx = 2 + 2\nx\n```\n", SourceSyntax::Fenced);
//! let executed = execute(doc, &ExecutorOptions::default()).unwrap();
//! assert_eq!(executed.code_blocks().next().unwrap().output.as_deref(), Some("4"));
//! ```

pub mod display;
pub mod engine;
pub mod inline;
pub mod interpreter;
pub mod protocol;
pub mod scope;
pub mod session;

#[cfg(test)]
mod fake;

pub use display::{format_block_error, run_block, BlockResult, Plan};
pub use engine::{execute, Executor, ExecutorOptions, DEFAULT_PYTHON, FIGURES_DIR};
pub use inline::resolve_inline;
pub use interpreter::{ExecError, Interpreter, Outcome, ValueMode};
pub use scope::{ScopeGuard, ScriptScope, STDIN_NAME};
pub use session::PythonSession;
