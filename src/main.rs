//! Lectern - A literate programming tool for Python.
//!
//! This binary wires the pipeline together: parse a document, apply
//! configuration, execute its Python blocks, render and write the report.

mod cli;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser as ClapParser;
use cli::{Cli, Command, RunArgs};
use log::{debug, error, info, LevelFilter};

use lectern_config::Config;
use lectern_core::{DocumentMetadata, LecternError, OutputFormat, Result};
use lectern_exec::ExecutorOptions;
use lectern_notebook::ExportOptions;
use lectern_syntax::Highlighter;

fn main() {
    let cli = <Cli as ClapParser>::parse();

    setup_logging(&cli.log_level, cli.verbose);
    info!("Lectern v{}", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Some(Command::ImportNotebook { input, output }) => {
            lectern_notebook::import_notebook(input, output)
        }
        Some(Command::ExportNotebook {
            input,
            output,
            execute,
            python,
        }) => export_notebook(input, output, *execute, python.as_deref()),
        Some(Command::Themes) => {
            cli::show_themes();
            Ok(())
        }
        Some(Command::Paths) => {
            cli::show_paths();
            Ok(())
        }
        None => process_document(&cli.run),
    };

    if let Err(e) = result {
        error!("{} ({})", e, e.kind());
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str, verbose: bool) {
    let mut filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };
    if verbose {
        filter = filter.max(LevelFilter::Info);
    }

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Parse, execute, render and write one document.
fn process_document(args: &RunArgs) -> Result<()> {
    let input = args
        .input
        .as_deref()
        .ok_or_else(|| LecternError::Value("no input file given".into()))?;

    let mut doc = lectern_parser::parse_file(input)?;
    let config = Config::load_with_override(args.config.as_deref())?;
    config.apply_to_metadata(&mut doc.metadata)?;
    apply_cli_overrides(args, &mut doc.metadata);

    let format = doc.metadata.output;
    if format == OutputFormat::Html {
        if let Some(theme) = &doc.metadata.code_theme {
            Highlighter::with_theme(theme)?;
        }
    }

    let options = ExecutorOptions {
        working_dir: None,
        timeout: args.timeout.or(config.execution.timeout),
        python: args
            .python
            .clone()
            .unwrap_or_else(|| config.execution.python().to_string()),
    };
    debug!("Executor options: {:?}", options);

    let executed = lectern_exec::execute(doc, &options)?;
    let text = lectern_render::render(&executed, Some(format))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, format));
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, text)?;
    info!("Wrote {} output to {}", format, output.display());
    Ok(())
}

/// Command-line flags win over config and frontmatter.
///
/// Only the typed fields change; `raw` keeps what the document and config
/// said, so flags never show up in re-emitted frontmatter.
fn apply_cli_overrides(args: &RunArgs, metadata: &mut DocumentMetadata) {
    if let Some(format) = args.format {
        metadata.output = format;
    }
    if let Some(dir) = &args.working_dir {
        metadata.working_dir = Some(dir.to_string_lossy().into_owned());
    }
    if let Some(theme) = &args.code_theme {
        metadata.code_theme = Some(theme.clone());
    }
    if args.no_footer {
        metadata.show_footer = false;
    }
}

/// `<stem>.html` next to the input for HTML, `<stem>.out.md` otherwise.
fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match format {
        OutputFormat::Html => format!("{}.html", stem),
        OutputFormat::Markdown => format!("{}.out.{}", stem, format.extension()),
    };
    input.with_file_name(name)
}

fn export_notebook(input: &Path, output: &Path, execute: bool, python: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let options = ExportOptions {
        execute,
        executor: ExecutorOptions {
            working_dir: config.execution.working_dir.clone(),
            timeout: config.execution.timeout,
            python: python.unwrap_or(config.execution.python()).to_string(),
        },
    };
    lectern_notebook::export_notebook(input, output, &options)
}
