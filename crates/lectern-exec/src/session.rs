//! A persistent Python worker process.
//!
//! The worker is `python -u -c <bootstrap>` with piped stdio. Requests and
//! responses are NDJSON on stdin/stdout; the worker's stderr is drained on a
//! background thread and logged.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use lectern_core::{LecternError, Result};
use log::{debug, info, trace, warn};

use crate::interpreter::{Interpreter, Outcome, ValueMode};
use crate::protocol::{self, Request, Response};
use crate::scope::ScriptScope;

/// Worker program, run with `-c`.
const BOOTSTRAP: &str = include_str!("bootstrap.py");

/// A live Python interpreter holding one namespace.
pub struct PythonSession {
    python: String,
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    drain: Option<JoinHandle<()>>,
    version: String,
    closed: bool,
}

impl std::fmt::Debug for PythonSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonSession")
            .field("python", &self.python)
            .field("pid", &self.child.id())
            .field("version", &self.version)
            .field("closed", &self.closed)
            .finish()
    }
}

impl PythonSession {
    /// Start a worker with the given interpreter executable.
    pub fn start(python: &str) -> Result<Self> {
        let mut child = Command::new(python)
            .arg("-u")
            .arg("-c")
            .arg(BOOTSTRAP)
            .env("MPLBACKEND", "Agg")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                LecternError::Interpreter(format!("could not start '{}': {}", python, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| LecternError::Interpreter("worker has no stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LecternError::Interpreter("worker has no stdout".into()))?;
        let drain = child.stderr.take().map(|stderr| {
            std::thread::spawn(move || {
                for line in BufReader::new(stderr).lines().map_while(|l| l.ok()) {
                    debug!(target: "lectern::python", "{}", line);
                }
            })
        });

        let mut session = Self {
            python: python.to_string(),
            child,
            stdin,
            stdout: BufReader::new(stdout),
            drain,
            version: String::new(),
            closed: false,
        };

        let hello = session.read_response()?;
        if !hello.ready {
            return Err(LecternError::Interpreter(format!(
                "'{}' did not complete the handshake",
                python
            )));
        }
        session.version = hello.version.unwrap_or_default();
        info!("Started {} (Python {})", python, session.version);

        Ok(session)
    }

    /// Python version reported by the worker.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Ask the worker to exit and wait for it.
    pub fn shutdown(mut self) -> Result<()> {
        self.close()
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let result = self.request(&Request::Shutdown).map(|_| ());
        self.closed = true;
        self.child.wait()?;
        if let Some(handle) = self.drain.take() {
            let _ = handle.join();
        }
        result
    }

    fn request(&mut self, request: &Request<'_>) -> Result<Response> {
        if self.closed {
            return Err(LecternError::Interpreter("python session is closed".into()));
        }

        let line = protocol::encode(request)
            .map_err(|e| LecternError::Interpreter(format!("encoding request: {}", e)))?;
        trace!("-> {}", line.trim_end());

        if let Err(e) = self
            .stdin
            .write_all(line.as_bytes())
            .and_then(|_| self.stdin.flush())
        {
            self.closed = true;
            return Err(LecternError::Interpreter(format!(
                "python session exited during '{}': {}",
                request.op(),
                e
            )));
        }

        let response = self.read_response()?;
        if !response.ok {
            return Err(LecternError::Interpreter(
                response
                    .fault
                    .unwrap_or_else(|| format!("'{}' failed", request.op())),
            ));
        }
        Ok(response)
    }

    fn read_response(&mut self) -> Result<Response> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line)?;
        if read == 0 {
            self.closed = true;
            let status = self
                .child
                .try_wait()
                .ok()
                .flatten()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unknown status".into());
            return Err(LecternError::Interpreter(format!(
                "python session exited unexpectedly ({})",
                status
            )));
        }
        trace!("<- {}", line.trim_end());
        protocol::decode(&line)
            .map_err(|e| LecternError::Interpreter(format!("malformed response: {}", e)))
    }
}

impl Drop for PythonSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.close() {
            warn!("Python session did not shut down cleanly: {}", e);
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        LecternError::Value(format!("path is not valid UTF-8: {}", path.display()))
    })
}

impl Interpreter for PythonSession {
    fn is_expression(&mut self, code: &str) -> Result<bool> {
        let response = self.request(&Request::IsExpression { code })?;
        Ok(response.flag.unwrap_or(false))
    }

    fn evaluate(&mut self, code: &str, mode: ValueMode) -> Result<Outcome<Option<String>>> {
        let response = self.request(&Request::Evaluate { code, mode })?;
        Ok(Outcome {
            value: match response.error {
                Some(err) => Err(err),
                None => Ok(response.value),
            },
            stdout: response.stdout,
            stderr: response.stderr,
        })
    }

    fn execute(&mut self, code: &str) -> Result<Outcome<()>> {
        let response = self.request(&Request::Execute { code })?;
        Ok(Outcome {
            value: response.error.map_or(Ok(()), Err),
            stdout: response.stdout,
            stderr: response.stderr,
        })
    }

    fn reset(&mut self) -> Result<()> {
        self.request(&Request::Reset)?;
        Ok(())
    }

    fn enter_scope(&mut self, scope: &ScriptScope) -> Result<()> {
        let working_dir = scope.working_dir.as_deref().map(path_str).transpose()?;
        self.request(&Request::EnterScope {
            file: path_str(&scope.file)?,
            script_dir: path_str(&scope.script_dir)?,
            working_dir,
        })?;
        Ok(())
    }

    fn leave_scope(&mut self) -> Result<()> {
        self.request(&Request::LeaveScope)?;
        Ok(())
    }

    fn clear_figures(&mut self) -> Result<()> {
        self.request(&Request::ClearFigures)?;
        Ok(())
    }

    fn save_figures(&mut self, dir: &Path, start: usize, dpi: u32) -> Result<Outcome<Vec<PathBuf>>> {
        let response = self.request(&Request::SaveFigures {
            dir: path_str(dir)?,
            start,
            dpi,
        })?;
        Ok(Outcome {
            value: match response.error {
                Some(err) => Err(err),
                None => Ok(response.paths.into_iter().map(PathBuf::from).collect()),
            },
            stdout: response.stdout,
            stderr: response.stderr,
        })
    }

    fn namespace(&mut self) -> Result<BTreeMap<String, String>> {
        Ok(self.request(&Request::Namespace)?.names)
    }
}
