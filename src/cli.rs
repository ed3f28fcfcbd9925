//! Command-line interface for Lectern.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lectern_core::OutputFormat;

/// Lectern - Run the Python inside Markdown and commented scripts.
///
/// Executes every Python block in document order against one namespace and
/// writes a report with outputs, errors and figures attached.
#[derive(Parser, Debug)]
#[command(
    name = "lectern",
    author = "Lectern Contributors",
    version,
    about = "A literate programming tool for Python",
    args_conflicts_with_subcommands = true,
    after_help = "Examples:\n  \
                  lectern report.md\n  \
                  lectern analysis.py --format html -o analysis.html\n  \
                  lectern import-notebook notebook.ipynb -o notebook.py\n  \
                  lectern export-notebook notebook.py -o notebook.ipynb --execute"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub run: RunArgs,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log pipeline progress (same as --loglevel info)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Options for processing a document.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Input document (.md with fenced code, or .py with #' comments)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output file (default: derived from the input name and format)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format: markdown, md or html
    #[arg(long = "format")]
    pub format: Option<OutputFormat>,

    /// Use a config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Working directory for code execution
    #[arg(long = "working-dir")]
    pub working_dir: Option<PathBuf>,

    /// Execution timeout in seconds (accepted, not enforced)
    #[arg(long = "timeout")]
    pub timeout: Option<f64>,

    /// Syntax highlighting theme for HTML output
    #[arg(long = "code-theme")]
    pub code_theme: Option<String>,

    /// Leave the attribution footer out of HTML output
    #[arg(long = "no-footer")]
    pub no_footer: bool,

    /// Python interpreter to run code with
    #[arg(long = "python")]
    pub python: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a Jupyter notebook (.ipynb) to commented Python (.py)
    ImportNotebook {
        /// Input notebook
        input: PathBuf,

        /// Output script
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },

    /// Convert a lectern document to a Jupyter notebook (.ipynb)
    ExportNotebook {
        /// Input document
        input: PathBuf,

        /// Output notebook
        #[arg(short = 'o', long = "output")]
        output: PathBuf,

        /// Run the document and store its outputs in the notebook
        #[arg(long = "execute")]
        execute: bool,

        /// Python interpreter used with --execute
        #[arg(long = "python")]
        python: Option<String>,
    },

    /// List syntax highlighting themes
    Themes,

    /// Show configuration paths
    Paths,
}

/// Show paths information.
pub fn show_paths() {
    use lectern_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());
    let exists = Config::config_path().is_some_and(|p| p.exists());

    println!("paths:");
    println!(
        "  config                {}{}",
        config_path,
        if exists { "" } else { " (not created)" }
    );
    println!("  figures               <document dir>/{}", lectern_exec::FIGURES_DIR);
}

/// Print every available highlighting theme.
pub fn show_themes() {
    let highlighter = lectern_syntax::Highlighter::new();
    for name in highlighter.themes() {
        if name == lectern_syntax::DEFAULT_THEME {
            println!("{} (default)", name);
        } else {
            println!("{}", name);
        }
    }
}
