//! Script identity and its scoped installation.
//!
//! While a document runs, its code sees itself as a script: `__file__` and
//! `sys.argv[0]` name the source, `sys.path[0]` is the source directory, and
//! the working directory may be switched. [`ScopeGuard`] undoes all of it on
//! every exit path.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use lectern_core::{LecternError, Result};
use log::{debug, warn};

use crate::interpreter::Interpreter;

/// Name used for `__file__` when a document has no source path.
pub const STDIN_NAME: &str = "<stdin>";

/// What a document run looks like from inside the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptScope {
    /// Absolute `__file__`
    pub file: PathBuf,
    /// Prepended to `sys.path`
    pub script_dir: PathBuf,
    /// Directory to `chdir` into, if any
    pub working_dir: Option<PathBuf>,
}

impl ScriptScope {
    /// Build the scope for a document.
    ///
    /// Without a source path `__file__` is `<cwd>/<stdin>`. A working
    /// directory that does not exist is reported as missing.
    pub fn for_document(source: Option<&Path>, working_dir: Option<&Path>) -> Result<Self> {
        let file = match source {
            Some(path) => std::path::absolute(path)?,
            None => std::env::current_dir()?.join(STDIN_NAME),
        };
        let script_dir = match file.parent() {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };

        let working_dir = match working_dir {
            Some(dir) => {
                let dir = std::path::absolute(dir)?;
                if !dir.is_dir() {
                    return Err(LecternError::NotFound(dir));
                }
                Some(dir)
            }
            None => None,
        };

        Ok(Self {
            file,
            script_dir,
            working_dir,
        })
    }
}

/// Holds an interpreter inside a [`ScriptScope`] until dropped.
pub struct ScopeGuard<'a, I: Interpreter + ?Sized> {
    interpreter: &'a mut I,
}

impl<'a, I: Interpreter + ?Sized> ScopeGuard<'a, I> {
    /// Enter `scope`; on failure nothing is installed.
    pub fn enter(interpreter: &'a mut I, scope: &ScriptScope) -> Result<Self> {
        interpreter.enter_scope(scope)?;
        debug!("Entered script scope for {}", scope.file.display());
        Ok(Self { interpreter })
    }
}

impl<I: Interpreter + ?Sized> Deref for ScopeGuard<'_, I> {
    type Target = I;

    fn deref(&self) -> &I {
        self.interpreter
    }
}

impl<I: Interpreter + ?Sized> DerefMut for ScopeGuard<'_, I> {
    fn deref_mut(&mut self) -> &mut I {
        self.interpreter
    }
}

impl<I: Interpreter + ?Sized> Drop for ScopeGuard<'_, I> {
    fn drop(&mut self) {
        if let Err(e) = self.interpreter.leave_scope() {
            warn!("Could not restore interpreter environment: {}", e);
        }
    }
}
