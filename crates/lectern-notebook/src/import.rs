//! Notebook to commented Python.
//!
//! Outputs are dropped; they are regenerated by running the script.

use std::path::Path;

use lectern_core::{LecternError, Result};
use lectern_parser::to_placeholders;
use log::info;
use serde_json::{Map, Value};
use serde_yaml::Mapping;

use crate::nbformat::{Cell, Notebook};
use crate::{read_notebook, write_text};

/// Tags that mark a code cell as hidden.
const HIDE_TAGS: &[&str] = &["hide", "hidden"];

/// Convert `input` (`.ipynb`) into a commented Python script at `output`.
pub fn import_notebook(input: &Path, output: &Path) -> Result<()> {
    let notebook = read_notebook(input)?;
    let script = notebook_to_script(&notebook)?;
    write_text(output, &script)?;
    info!(
        "Imported {} cells from {} into {}",
        notebook.cells.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

/// Render a notebook as commented Python text.
pub fn notebook_to_script(notebook: &Notebook) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();

    let frontmatter = frontmatter_from_metadata(&notebook.metadata);
    if !frontmatter.is_empty() {
        let yaml = serde_yaml::to_string(&frontmatter)
            .map_err(|e| LecternError::Notebook(format!("frontmatter: {}", e)))?;
        lines.push("#' ---".to_string());
        lines.extend(yaml.lines().map(comment_line));
        lines.push("#' ---".to_string());
        lines.push("#'".to_string());
    }

    for cell in &notebook.cells {
        let source = cell.source().text();
        if source.trim().is_empty() {
            continue;
        }

        match cell {
            Cell::Markdown { .. } => {
                lines.extend(source.lines().map(|l| comment_line(&to_placeholders(l))));
                lines.push("#'".to_string());
            }
            Cell::Code { metadata, .. } => {
                let hidden = HIDE_TAGS.iter().any(|t| metadata.has_tag(t));
                if hidden {
                    lines.push("#| hide".to_string());
                }
                lines.extend(source.lines().map(str::to_string));
                if hidden {
                    lines.push("#|".to_string());
                }
                lines.push(String::new());
            }
            Cell::Raw { .. } => {
                lines.push("#' ```".to_string());
                lines.extend(source.lines().map(comment_line));
                lines.push("#' ```".to_string());
                lines.push("#'".to_string());
            }
        }
    }

    let mut script = lines.join("\n");
    script.push('\n');
    Ok(script)
}

/// Frontmatter keys drawn from notebook metadata.
///
/// `title`, `authors` (joined as `author`), a non-Python language and a
/// non-default kernel are carried over.
pub fn frontmatter_from_metadata(metadata: &Map<String, Value>) -> Mapping {
    let mut frontmatter = Mapping::new();

    if let Some(title) = metadata.get("title").and_then(scalar_text) {
        frontmatter.insert("title".into(), title.into());
    }

    if let Some(authors) = metadata.get("authors") {
        let joined = match authors {
            Value::Array(list) => list
                .iter()
                .filter_map(|a| match a {
                    Value::Object(obj) => obj.get("name").and_then(scalar_text),
                    other => scalar_text(other),
                })
                .collect::<Vec<_>>()
                .join(", "),
            other => scalar_text(other).unwrap_or_default(),
        };
        if !joined.is_empty() {
            frontmatter.insert("author".into(), joined.into());
        }
    }

    if let Some(language) = metadata
        .get("language_info")
        .and_then(|info| info.get("name"))
        .and_then(Value::as_str)
        .filter(|name| *name != "python")
    {
        frontmatter.insert("language".into(), language.into());
    }

    if let Some(kernel) = metadata
        .get("kernelspec")
        .and_then(|kernel| kernel.get("name"))
        .and_then(Value::as_str)
        .filter(|name| *name != "python3")
    {
        frontmatter.insert("kernel".into(), kernel.into());
    }

    frontmatter
}

fn comment_line(text: &str) -> String {
    if text.trim().is_empty() {
        "#'".to_string()
    } else {
        format!("#' {}", text)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
