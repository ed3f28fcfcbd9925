//! Sequential document execution.

use std::path::{Path, PathBuf};

use lectern_core::{Block, CodeBlock, Document, ExecutedDocument, Result};
use log::{debug, info, warn};

use crate::display::{format_block_error, run_block};
use crate::inline::resolve_inline;
use crate::interpreter::Interpreter;
use crate::scope::{ScopeGuard, ScriptScope};
use crate::session::PythonSession;

/// Default interpreter executable.
pub const DEFAULT_PYTHON: &str = "python3";

/// Directory, next to the source document, that receives saved figures.
pub const FIGURES_DIR: &str = "figures";

/// Knobs for one execution run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutorOptions {
    /// Fallback working directory when the document does not set one
    pub working_dir: Option<PathBuf>,
    /// Per-block time limit in seconds; accepted but not enforced
    pub timeout: Option<f64>,
    /// Interpreter executable
    pub python: String,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            working_dir: None,
            timeout: None,
            python: DEFAULT_PYTHON.to_string(),
        }
    }
}

/// Runs documents against one interpreter.
///
/// The interpreter process is reused between runs, but each run starts
/// from an empty namespace.
#[derive(Debug)]
pub struct Executor<I: Interpreter> {
    interpreter: I,
    options: ExecutorOptions,
}

impl Executor<PythonSession> {
    /// Start a Python session for `options.python`.
    pub fn start(options: ExecutorOptions) -> Result<Self> {
        let session = PythonSession::start(&options.python)?;
        Ok(Self::with_interpreter(session, options))
    }
}

impl<I: Interpreter> Executor<I> {
    pub fn with_interpreter(interpreter: I, options: ExecutorOptions) -> Self {
        Self {
            interpreter,
            options,
        }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    pub fn into_interpreter(self) -> I {
        self.interpreter
    }

    /// Execute every block of `doc` in order.
    ///
    /// Only failures to set up the run are errors. Anything user code does
    /// wrong ends up on the block that did it. Bindings from earlier runs
    /// are gone.
    pub fn run(&mut self, doc: Document) -> Result<ExecutedDocument> {
        if let Some(timeout) = self.options.timeout {
            warn!(
                "Timeout of {}s requested; block execution is not time-limited",
                timeout
            );
        }

        let working_dir = doc
            .metadata
            .working_dir
            .as_deref()
            .map(PathBuf::from)
            .or_else(|| self.options.working_dir.clone());
        let figures_dir = figures_dir_for(doc.source_path.as_deref())?;
        let scope = ScriptScope::for_document(doc.source_path.as_deref(), working_dir.as_deref())?;
        let dpi = doc.metadata.plot_dpi;

        info!(
            "Executing {} blocks from {}",
            doc.blocks.len(),
            scope.file.display()
        );

        let mut executed = ExecutedDocument::from_document(Document {
            blocks: Vec::new(),
            metadata: doc.metadata,
            source_path: doc.source_path,
        });

        self.interpreter.reset()?;
        let mut guard = ScopeGuard::enter(&mut self.interpreter, &scope)?;
        let mut figure_count = 0;

        for block in doc.blocks {
            let block = match block {
                Block::Markdown(mut md) => {
                    md.content = resolve_inline(&mut *guard, &md.content);
                    Block::Markdown(md)
                }
                Block::Code(code) if code.is_executable() => {
                    Block::Code(run_code_block(&mut *guard, code, &figures_dir, &mut figure_count, dpi))
                }
                other => other,
            };
            executed.blocks.push(block);
        }

        executed.namespace = match guard.namespace() {
            Ok(names) => names,
            Err(e) => {
                warn!("Could not collect namespace: {}", e);
                Default::default()
            }
        };
        drop(guard);

        info!(
            "Executed {} code blocks, {} saved figures",
            executed.code_blocks().filter(|b| b.is_executable()).count(),
            figure_count
        );
        Ok(executed)
    }
}

fn run_code_block<I: Interpreter + ?Sized>(
    interpreter: &mut I,
    mut block: CodeBlock,
    figures_dir: &Path,
    figure_count: &mut usize,
    dpi: u32,
) -> CodeBlock {
    if let Err(e) = interpreter.clear_figures() {
        warn!("Could not clear figures before line {}: {}", block.line_number, e);
    }

    let result = run_block(interpreter, &block.content);
    if !result.output.is_empty() {
        block.output = Some(result.output);
    }

    if let Some(err) = result.error {
        debug!("Block at line {} raised {}", block.line_number, err);
        block.error = Some(format_block_error(&err, block.line_number));
        return block;
    }

    match interpreter.save_figures(figures_dir, *figure_count, dpi) {
        Ok(outcome) => match outcome.value {
            Ok(paths) => {
                *figure_count += paths.len();
                block.figures = paths;
            }
            Err(err) => block.error = Some(format_block_error(&err, block.line_number)),
        },
        Err(e) => {
            block.error = Some(format_block_error(&e.into(), block.line_number));
        }
    }
    block
}

fn figures_dir_for(source: Option<&Path>) -> Result<PathBuf> {
    let base = source
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(std::path::absolute(base.join(FIGURES_DIR))?)
}

/// Execute `doc` in a fresh Python session.
pub fn execute(doc: Document, options: &ExecutorOptions) -> Result<ExecutedDocument> {
    let mut executor = Executor::start(options.clone())?;
    let executed = executor.run(doc)?;
    executor.into_interpreter().shutdown()?;
    Ok(executed)
}
