//! Commented Python (or fenced Markdown) to notebook.

use std::path::Path;

use lectern_core::{Block, Document, ExecutedDocument, LecternError, Result};
use lectern_exec::ExecutorOptions;
use log::info;
use serde_json::{json, Map, Value};

use crate::nbformat::{Cell, Notebook, Output};
use crate::write_text;

/// Tag written on cells built from hidden blocks.
pub const HIDE_TAG: &str = "hide";

/// How an export runs.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Run the document and attach its outputs to the code cells
    pub execute: bool,
    /// Interpreter settings used when `execute` is set
    pub executor: ExecutorOptions,
}

/// Convert the document at `input` into a notebook at `output`.
pub fn export_notebook(input: &Path, output: &Path, options: &ExportOptions) -> Result<()> {
    let doc = lectern_parser::parse_file(input)?;

    let mut notebook = document_to_notebook(&doc)?;
    if options.execute {
        let executed = lectern_exec::execute(doc, &options.executor)?;
        attach_outputs(&mut notebook, &executed);
    }

    let json = serde_json::to_string_pretty(&notebook)
        .map_err(|e| LecternError::Notebook(format!("encoding notebook: {}", e)))?;
    write_text(output, &format!("{}\n", json))?;
    info!(
        "Exported {} cells from {} into {}",
        notebook.cells.len(),
        input.display(),
        output.display()
    );
    Ok(())
}

/// Build a notebook with one cell per block, in order.
///
/// Executable code becomes code cells. Code in other languages has no
/// kernel to run in, so it is kept as a fenced block in a markdown cell.
pub fn document_to_notebook(doc: &Document) -> Result<Notebook> {
    let mut notebook = Notebook {
        metadata: notebook_metadata(doc)?,
        ..Default::default()
    };

    for (index, block) in doc.blocks.iter().enumerate() {
        let id = format!("cell-{}", index);
        let cell = match block {
            Block::Markdown(md) => Cell::markdown(id, md.content.clone()),
            Block::Code(code) if code.is_executable() => {
                let tags = if code.hidden {
                    vec![HIDE_TAG.to_string()]
                } else {
                    Vec::new()
                };
                Cell::code(id, code.content.clone(), tags)
            }
            Block::Code(code) => Cell::markdown(
                id,
                format!("```{}\n{}\n```", code.language, code.content.trim_end()),
            ),
        };
        notebook.cells.push(cell);
    }

    Ok(notebook)
}

/// Python kernel metadata with the document's frontmatter merged over it.
fn notebook_metadata(doc: &Document) -> Result<Map<String, Value>> {
    let mut metadata = Map::new();
    metadata.insert(
        "kernelspec".to_string(),
        json!({
            "display_name": "Python 3",
            "language": "python",
            "name": "python3"
        }),
    );
    metadata.insert(
        "language_info".to_string(),
        json!({
            "name": "python",
            "mimetype": "text/x-python",
            "file_extension": ".py",
            "codemirror_mode": {"name": "ipython", "version": 3},
            "pygments_lexer": "ipython3"
        }),
    );

    if !doc.metadata.raw.is_empty() {
        let frontmatter = serde_json::to_value(&doc.metadata.raw)
            .map_err(|e| LecternError::Notebook(format!("frontmatter: {}", e)))?;
        if let Value::Object(map) = frontmatter {
            metadata.extend(map);
        }
    }

    Ok(metadata)
}

/// Copy outputs of an executed run onto the matching code cells.
///
/// Blocks and cells correspond one to one, so the two are zipped.
pub fn attach_outputs(notebook: &mut Notebook, executed: &ExecutedDocument) {
    let mut count = 0;
    for (cell, block) in notebook.cells.iter_mut().zip(&executed.blocks) {
        let (Cell::Code { execution_count, outputs, .. }, Some(code)) = (cell, block.as_code())
        else {
            continue;
        };

        count += 1;
        *execution_count = Some(count);
        outputs.clear();

        if let Some(text) = code.output.as_deref().filter(|s| !s.is_empty()) {
            outputs.push(Output::stdout(format!("{}\n", text)));
        }
        if let Some(error) = code.error.as_deref().filter(|s| !s.is_empty()) {
            outputs.push(error_output(error));
        }
    }
}

/// Split a formatted block error back into exception name and value.
fn error_output(error: &str) -> Output {
    let first = error.lines().next().unwrap_or_default();
    let (ename, evalue) = first.split_once(": ").unwrap_or((first, ""));
    Output::Error {
        ename: ename.to_string(),
        evalue: evalue.to_string(),
        traceback: error.lines().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_parser::{parse, SourceSyntax};

    const SCRIPT: &str = "#' ---\n#' title: Demo\n#' ---\n#' # Heading\n\nx = 1\n\n#| hide\nimport os\n#|\n";

    #[test]
    fn test_blocks_become_cells() {
        let doc = parse(SCRIPT, SourceSyntax::Commented);
        let nb = document_to_notebook(&doc).unwrap();

        assert_eq!(nb.nbformat, 4);
        assert_eq!(nb.nbformat_minor, 5);
        assert_eq!(nb.cells.len(), 3);
        assert!(matches!(nb.cells[0], Cell::Markdown { .. }));
        assert_eq!(nb.cells[1].source().text(), "x = 1");
        assert!(!nb.cells[1].metadata().has_tag(HIDE_TAG));
        assert!(nb.cells[2].metadata().has_tag(HIDE_TAG));
    }

    #[test]
    fn test_metadata_merged() {
        let doc = parse(SCRIPT, SourceSyntax::Commented);
        let nb = document_to_notebook(&doc).unwrap();

        assert_eq!(nb.metadata["title"], "Demo");
        assert_eq!(nb.metadata["kernelspec"]["name"], "python3");
        assert_eq!(nb.metadata["language_info"]["name"], "python");
    }

    #[test]
    fn test_unexecuted_cells_have_no_outputs() {
        let doc = parse(SCRIPT, SourceSyntax::Commented);
        let nb = document_to_notebook(&doc).unwrap();
        for cell in &nb.cells {
            if let Cell::Code {
                outputs,
                execution_count,
                ..
            } = cell
            {
                assert!(outputs.is_empty());
                assert!(execution_count.is_none());
            }
        }
    }

    #[test]
    fn test_other_language_kept_as_markdown() {
        let doc = parse("```sql\nSELECT 1;\n```\n", SourceSyntax::Fenced);
        let nb = document_to_notebook(&doc).unwrap();
        assert!(matches!(nb.cells[0], Cell::Markdown { .. }));
        assert_eq!(nb.cells[0].source().text(), "```sql\nSELECT 1;\n```");
    }

    #[test]
    fn test_attach_outputs() {
        let doc = parse("#' Intro\n\nprint('hi')\n\n#' Next\n\n1 / 0\n", SourceSyntax::Commented);
        let mut nb = document_to_notebook(&doc).unwrap();

        let mut executed = ExecutedDocument::from_document(doc);
        if let Block::Code(code) = &mut executed.blocks[1] {
            code.output = Some("hi".to_string());
        }
        if let Block::Code(code) = &mut executed.blocks[3] {
            code.error =
                Some("ZeroDivisionError: division by zero\n  at line 7 in code block".to_string());
        }
        attach_outputs(&mut nb, &executed);

        let Cell::Code { outputs, execution_count, .. } = &nb.cells[1] else {
            panic!("expected code cell");
        };
        assert_eq!(*execution_count, Some(1));
        assert_eq!(outputs, &vec![Output::stdout("hi\n".to_string())]);

        let Cell::Code { outputs, execution_count, .. } = &nb.cells[3] else {
            panic!("expected code cell");
        };
        assert_eq!(*execution_count, Some(2));
        match &outputs[0] {
            Output::Error { ename, evalue, traceback } => {
                assert_eq!(ename, "ZeroDivisionError");
                assert_eq!(evalue, "division by zero");
                assert_eq!(traceback.len(), 2);
            }
            other => panic!("expected error output, got {other:?}"),
        }
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.py");
        let output = dir.path().join("out").join("demo.ipynb");
        std::fs::write(&input, SCRIPT).unwrap();

        export_notebook(&input, &output, &ExportOptions::default()).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let nb: Notebook = serde_json::from_str(&text).unwrap();
        assert_eq!(nb.cells.len(), 3);
    }

    #[test]
    fn test_export_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = export_notebook(
            &dir.path().join("missing.py"),
            &dir.path().join("out.ipynb"),
            &ExportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LecternError::NotFound(_)));
    }
}
