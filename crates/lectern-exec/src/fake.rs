//! Scripted interpreter for unit tests.
//!
//! Knows nothing about Python: every answer comes from the tables below,
//! and every call is recorded so tests can assert on dispatch.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use lectern_core::{LecternError, Result};

use crate::interpreter::{ExecError, Interpreter, Outcome, ValueMode};
use crate::scope::ScriptScope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    IsExpression(String),
    Evaluate(String, ValueMode),
    Execute(String),
    Reset,
    EnterScope(PathBuf),
    LeaveScope,
    ClearFigures,
    SaveFigures(usize),
    Namespace,
}

#[derive(Debug, Default)]
pub struct FakeInterpreter {
    pub calls: Vec<Call>,
    /// Expression source to its value (`None` = Python None)
    pub values: HashMap<String, Option<String>>,
    /// Source to the exception it raises, for both evaluate and execute
    pub raises: HashMap<String, ExecError>,
    /// Source to what it prints
    pub prints: HashMap<String, String>,
    /// Figures left open by the next successful request
    pub open_figures: usize,
    pub scope_depth: i32,
    pub bindings: BTreeMap<String, String>,
    /// Fail every request as if the process had died
    pub dead: bool,
}

impl FakeInterpreter {
    pub fn with_value(mut self, code: &str, value: Option<&str>) -> Self {
        self.values
            .insert(code.to_string(), value.map(str::to_string));
        self
    }

    pub fn with_raise(mut self, code: &str, kind: &str, message: &str) -> Self {
        self.raises
            .insert(code.to_string(), ExecError::new(kind, message));
        self
    }

    pub fn with_print(mut self, code: &str, text: &str) -> Self {
        self.prints.insert(code.to_string(), text.to_string());
        self
    }

    pub fn executed(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Execute(code) => Some(code.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn evaluated(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Evaluate(code, _) => Some(code.as_str()),
                _ => None,
            })
            .collect()
    }

    fn check_alive(&self) -> Result<()> {
        if self.dead {
            return Err(LecternError::Interpreter("session exited".into()));
        }
        Ok(())
    }

    fn printed(&self, code: &str) -> String {
        self.prints.get(code).cloned().unwrap_or_default()
    }
}

impl Interpreter for FakeInterpreter {
    fn is_expression(&mut self, code: &str) -> Result<bool> {
        self.check_alive()?;
        self.calls.push(Call::IsExpression(code.to_string()));
        Ok(self.values.contains_key(code) || self.raises.contains_key(code))
    }

    fn evaluate(&mut self, code: &str, mode: ValueMode) -> Result<Outcome<Option<String>>> {
        self.check_alive()?;
        self.calls.push(Call::Evaluate(code.to_string(), mode));
        if let Some(err) = self.raises.get(code) {
            return Ok(Outcome::err(err.clone()).with_stdout(self.printed(code)));
        }
        match self.values.get(code) {
            Some(value) => Ok(Outcome::ok(value.clone()).with_stdout(self.printed(code))),
            None => Ok(Outcome::err(ExecError::new("SyntaxError", "invalid syntax"))),
        }
    }

    fn execute(&mut self, code: &str) -> Result<Outcome<()>> {
        self.check_alive()?;
        self.calls.push(Call::Execute(code.to_string()));
        if let Some(err) = self.raises.get(code) {
            return Ok(Outcome::err(err.clone()).with_stdout(self.printed(code)));
        }
        if let Some((name, value)) = code.split_once(" = ") {
            self.bindings
                .insert(name.trim().to_string(), value.trim().to_string());
        }
        Ok(Outcome::ok(()).with_stdout(self.printed(code)))
    }

    fn reset(&mut self) -> Result<()> {
        self.check_alive()?;
        self.calls.push(Call::Reset);
        self.bindings.clear();
        self.open_figures = 0;
        Ok(())
    }

    fn enter_scope(&mut self, scope: &ScriptScope) -> Result<()> {
        self.check_alive()?;
        self.calls.push(Call::EnterScope(scope.file.clone()));
        self.scope_depth += 1;
        Ok(())
    }

    fn leave_scope(&mut self) -> Result<()> {
        self.calls.push(Call::LeaveScope);
        self.scope_depth -= 1;
        Ok(())
    }

    fn clear_figures(&mut self) -> Result<()> {
        self.check_alive()?;
        self.calls.push(Call::ClearFigures);
        Ok(())
    }

    fn save_figures(&mut self, dir: &Path, start: usize, _dpi: u32) -> Result<Outcome<Vec<PathBuf>>> {
        self.check_alive()?;
        self.calls.push(Call::SaveFigures(start));
        let paths = (0..self.open_figures)
            .map(|i| dir.join(format!("figure_{}.png", start + i)))
            .collect();
        self.open_figures = 0;
        Ok(Outcome::ok(paths))
    }

    fn namespace(&mut self) -> Result<BTreeMap<String, String>> {
        self.check_alive()?;
        self.calls.push(Call::Namespace);
        Ok(self.bindings.clone())
    }
}
