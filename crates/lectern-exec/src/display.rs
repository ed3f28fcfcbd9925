//! Per-block execution with auto-display.
//!
//! A block behaves like a notebook cell: if it ends in an expression, the
//! expression's `repr` is shown as if it had been printed.

use log::debug;

use crate::interpreter::{ExecError, Interpreter, Outcome, ValueMode};

/// How a block's source will be run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan<'a> {
    /// One line: evaluate it, executing instead on a syntax error
    Single(&'a str),
    /// Execute everything, show nothing extra
    Statements(&'a str),
    /// Execute `body`, then evaluate `last` and show it
    Trailing { body: String, last: &'a str },
}

/// Decide how to run `code`.
///
/// Any line ending in `:` (after trailing whitespace) suppresses
/// auto-display for the whole block, so a bare expression inside an
/// indented suite is never lifted out of it.
pub fn plan<'a, I: Interpreter + ?Sized>(
    interpreter: &mut I,
    code: &'a str,
) -> Result<Plan<'a>, ExecError> {
    let source = code.trim();
    let lines: Vec<&str> = source.split('\n').collect();

    if lines.len() == 1 {
        return Ok(Plan::Single(source));
    }
    if lines.iter().any(|l| l.trim_end().ends_with(':')) {
        return Ok(Plan::Statements(source));
    }

    let (last, body) = match lines.split_last() {
        Some((last, body)) => (last.trim(), body),
        None => return Ok(Plan::Statements(source)),
    };
    if !last.is_empty() && interpreter.is_expression(last)? {
        return Ok(Plan::Trailing {
            body: body.join("\n"),
            last,
        });
    }
    Ok(Plan::Statements(source))
}

/// What running a block produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockResult {
    /// Printed text plus any auto-displayed value, trailing whitespace trimmed
    pub output: String,
    /// First exception raised, if any
    pub error: Option<ExecError>,
}

/// Accumulates captured streams across the requests of one block.
#[derive(Debug, Default)]
struct Transcript {
    stdout: String,
    stderr: String,
}

impl Transcript {
    fn record<T>(&mut self, outcome: Outcome<T>) -> Result<T, ExecError> {
        self.stdout.push_str(&outcome.stdout);
        self.stderr.push_str(&outcome.stderr);
        outcome.value
    }

    fn display(&mut self, value: Option<String>) {
        if let Some(repr) = value {
            self.stdout.push_str(&repr);
            self.stdout.push('\n');
        }
    }
}

/// Run one block of code against `interpreter`.
///
/// Never fails: session breakage is reported like any other exception.
pub fn run_block<I: Interpreter + ?Sized>(interpreter: &mut I, code: &str) -> BlockResult {
    let mut transcript = Transcript::default();
    let error = run_planned(interpreter, code, &mut transcript).err();

    if !transcript.stderr.is_empty() {
        debug!("Block stderr:\n{}", transcript.stderr.trim_end());
    }

    BlockResult {
        output: transcript.stdout.trim_end().to_string(),
        error,
    }
}

fn run_planned<I: Interpreter + ?Sized>(
    interpreter: &mut I,
    code: &str,
    transcript: &mut Transcript,
) -> Result<(), ExecError> {
    match plan(interpreter, code)? {
        Plan::Single(source) => {
            let outcome = interpreter.evaluate(source, ValueMode::Repr)?;
            match transcript.record(outcome) {
                Ok(value) => transcript.display(value),
                Err(e) if e.is_syntax_error() => {
                    transcript.record(interpreter.execute(source)?)?;
                }
                Err(e) => return Err(e),
            }
        }
        Plan::Statements(source) => {
            transcript.record(interpreter.execute(source)?)?;
        }
        Plan::Trailing { body, last } => {
            if !body.trim().is_empty() {
                transcript.record(interpreter.execute(&body)?)?;
            }
            let outcome = interpreter.evaluate(last, ValueMode::Repr)?;
            match outcome.value {
                Ok(value) => {
                    transcript.record(Outcome {
                        value: Ok(()),
                        stdout: outcome.stdout,
                        stderr: outcome.stderr,
                    })?;
                    transcript.display(value);
                }
                Err(e) => {
                    // Whatever the failed evaluation printed stays in the
                    // transcript ahead of the statement retry's output.
                    debug!("Evaluating '{}' raised {}; executing instead", last, e);
                    transcript.stdout.push_str(&outcome.stdout);
                    transcript.stderr.push_str(&outcome.stderr);
                    transcript.record(interpreter.execute(last)?)?;
                }
            }
        }
    }
    Ok(())
}

/// Format a block error with its source location.
pub fn format_block_error(error: &ExecError, line_number: usize) -> String {
    if line_number > 0 {
        format!("{}\n  at line {} in code block", error, line_number)
    } else {
        error.to_string()
    }
}
