//! Lectern Notebook
//!
//! Conversion between Jupyter notebooks (nbformat 4) and lectern's
//! commented-Python format.
//!
//! # Overview
//!
//! - [`import_notebook`] - `.ipynb` to `#'`-commented Python, outputs dropped
//! - [`export_notebook`] - a lectern document to `.ipynb`, optionally executed

pub mod export;
pub mod import;
pub mod nbformat;

pub use export::{attach_outputs, document_to_notebook, export_notebook, ExportOptions};
pub use import::{frontmatter_from_metadata, import_notebook, notebook_to_script};
pub use nbformat::{Cell, Notebook, Output};

use std::path::Path;

use lectern_core::{LecternError, Result};

/// Read and decode a notebook file.
pub fn read_notebook(path: &Path) -> Result<Notebook> {
    if !path.exists() {
        return Err(LecternError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    let notebook: Notebook = serde_json::from_str(&text)
        .map_err(|e| LecternError::Notebook(format!("{}: {}", path.display(), e)))?;
    if notebook.nbformat != nbformat::NBFORMAT {
        return Err(LecternError::Notebook(format!(
            "{}: unsupported nbformat {}",
            path.display(),
            notebook.nbformat
        )));
    }
    Ok(notebook)
}

/// Write `text` to `path`, creating parent directories.
pub(crate) fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)?;
    Ok(())
}
