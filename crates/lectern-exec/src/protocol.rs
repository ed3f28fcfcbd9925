//! NDJSON messages exchanged with the Python worker.
//!
//! One JSON object per line in each direction. Every request gets exactly
//! one response; the worker speaks first with a ready handshake.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::interpreter::{ExecError, ValueMode};

/// A request to the worker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request<'a> {
    Reset,
    EnterScope {
        file: &'a str,
        script_dir: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        working_dir: Option<&'a str>,
    },
    LeaveScope,
    IsExpression {
        code: &'a str,
    },
    Evaluate {
        code: &'a str,
        mode: ValueMode,
    },
    Execute {
        code: &'a str,
    },
    ClearFigures,
    SaveFigures {
        dir: &'a str,
        start: usize,
        dpi: u32,
    },
    Namespace,
    Shutdown,
}

impl Request<'_> {
    /// Short name for logs.
    pub fn op(&self) -> &'static str {
        match self {
            Request::Reset => "reset",
            Request::EnterScope { .. } => "enter_scope",
            Request::LeaveScope => "leave_scope",
            Request::IsExpression { .. } => "is_expression",
            Request::Evaluate { .. } => "evaluate",
            Request::Execute { .. } => "execute",
            Request::ClearFigures => "clear_figures",
            Request::SaveFigures { .. } => "save_figures",
            Request::Namespace => "namespace",
            Request::Shutdown => "shutdown",
        }
    }
}

/// A response from the worker.
///
/// `ok == false` means the worker could not carry out the request at all
/// (`fault` says why). A user exception is `ok == true` with `error` set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Response {
    pub ok: bool,
    pub fault: Option<String>,
    pub error: Option<ExecError>,
    pub stdout: String,
    pub stderr: String,
    /// Rendered value of an evaluation; absent for Python `None`
    pub value: Option<String>,
    /// Answer to `is_expression`
    pub flag: Option<bool>,
    /// Files written by `save_figures`
    pub paths: Vec<String>,
    /// Bindings returned by `namespace`
    pub names: BTreeMap<String, String>,
    /// Set only on the handshake
    pub ready: bool,
    /// Interpreter version, sent with the handshake
    pub version: Option<String>,
}

/// Encode a request as one protocol line, newline included.
pub fn encode(request: &Request<'_>) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    Ok(line)
}

/// Decode one protocol line.
pub fn decode(line: &str) -> serde_json::Result<Response> {
    serde_json::from_str(line.trim_end())
}
