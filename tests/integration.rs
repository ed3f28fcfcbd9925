//! Integration tests for lectern.
//!
//! These run documents end to end against a real `python3`. Each test that
//! needs an interpreter skips itself when none is installed.

use std::fs;
use std::path::Path;
use std::process::Command;

use lectern_core::{Block, CodeBlock, ExecutedDocument, LecternError, OutputFormat};
use lectern_exec::{execute, Executor, ExecutorOptions};
use lectern_parser::{parse, parse_auto, SourceSyntax};
use lectern_render::render;

fn python_available() -> bool {
    Command::new("python3")
        .args(["-c", "pass"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn matplotlib_available() -> bool {
    Command::new("python3")
        .args(["-c", "import matplotlib"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

macro_rules! require_python {
    () => {
        if !python_available() {
            eprintln!("skipping: python3 not available");
            return;
        }
    };
}

fn run_fenced(text: &str) -> ExecutedDocument {
    execute(parse(text, SourceSyntax::Fenced), &ExecutorOptions::default()).unwrap()
}

fn run_commented(text: &str) -> ExecutedDocument {
    execute(parse(text, SourceSyntax::Commented), &ExecutorOptions::default()).unwrap()
}

fn code_blocks(doc: &ExecutedDocument) -> Vec<&CodeBlock> {
    doc.code_blocks().collect()
}

// =============================================================================
// Auto-display
// =============================================================================

#[test]
fn test_single_expression_displays() {
    require_python!();
    let doc = run_fenced("```python\n2 + 2\n```\n");
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("4"));
}

#[test]
fn test_assignment_displays_nothing() {
    require_python!();
    let doc = run_fenced("```python\nx = 4\n```\n");
    assert!(code_blocks(&doc)[0].output.is_none());
    assert!(code_blocks(&doc)[0].error.is_none());
}

#[test]
fn test_trailing_name_displays() {
    require_python!();
    let doc = run_fenced("```python\nx = 5\ny = x * 2\ny\n```\n");
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("10"));
}

#[test]
fn test_repr_used_for_display() {
    require_python!();
    let doc = run_fenced("```python\nname = 'ada'\nname\n```\n");
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("'ada'"));
}

#[test]
fn test_if_header_suppresses_display() {
    require_python!();
    let doc = run_fenced("```python\nif True:\n    x = 1\nx\n```\n");
    assert!(code_blocks(&doc)[0].output.is_none());
}

#[test]
fn test_print_and_display_combined() {
    require_python!();
    let doc = run_fenced("```python\nprint('hello')\n3 * 3\n```\n");
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("hello\n9"));
}

#[test]
fn test_trailing_call_returning_none() {
    require_python!();
    let doc = run_fenced("```python\nitems = []\nitems.append(1)\n```\n");
    assert!(code_blocks(&doc)[0].output.is_none());
}

// =============================================================================
// Namespace and failures
// =============================================================================

#[test]
fn test_namespace_persists() {
    require_python!();
    let doc = run_fenced(
        "```python\ndef square(n):\n    return n * n\n```\n\nText\n\n```python\nsquare(7)\n```\n",
    );
    assert_eq!(code_blocks(&doc)[1].output.as_deref(), Some("49"));
    assert!(doc.namespace.contains_key("square"));
}

#[test]
fn test_failure_isolation() {
    require_python!();
    let doc = run_fenced(
        "```python\nx = 1\n```\n\n```python\nundefined_name\n```\n\n```python\nx + 1\n```\n",
    );
    let blocks = code_blocks(&doc);

    assert!(blocks[0].error.is_none());
    let error = blocks[1].error.as_deref().unwrap();
    assert!(error.starts_with("NameError: name 'undefined_name' is not defined"));
    assert!(error.contains("at line"));
    assert_eq!(blocks[2].output.as_deref(), Some("2"));
}

#[test]
fn test_output_before_error_kept() {
    require_python!();
    let doc = run_fenced("```python\nprint('before')\nraise ValueError('bad value')\n```\n");
    let block = code_blocks(&doc)[0];
    assert_eq!(block.output.as_deref(), Some("before"));
    assert!(block.error.as_deref().unwrap().starts_with("ValueError: bad value"));
}

#[test]
fn test_system_exit_is_a_block_error() {
    require_python!();
    let doc = run_fenced("```python\nraise SystemExit(3)\n```\n\n```python\n1 + 1\n```\n");
    let blocks = code_blocks(&doc);
    assert!(blocks[0].error.as_deref().unwrap().starts_with("SystemExit"));
    assert_eq!(blocks[1].output.as_deref(), Some("2"));
}

#[test]
fn test_stdin_is_closed() {
    require_python!();
    let doc = run_fenced("```python\ninput()\n```\n");
    assert!(code_blocks(&doc)[0].error.as_deref().unwrap().starts_with("EOFError"));
}

#[test]
fn test_stderr_not_in_output() {
    require_python!();
    let doc = run_fenced("```python\nimport sys\nprint('err', file=sys.stderr)\nprint('out')\n```\n");
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("out"));
}

#[test]
fn test_non_python_untouched() {
    require_python!();
    let doc = run_fenced("```bash\necho hi\n```\n");
    let block = code_blocks(&doc)[0];
    assert!(block.output.is_none());
    assert!(block.error.is_none());
}

// =============================================================================
// Hidden blocks and inline expressions
// =============================================================================

#[test]
fn test_hidden_block_executes_but_is_not_rendered() {
    require_python!();
    let doc = run_commented("#| hide\nsecret = 42\n#|\n\nsecret + 1\n");
    let blocks = code_blocks(&doc);
    assert!(blocks[0].hidden);
    assert_eq!(blocks[1].output.as_deref(), Some("43"));

    for format in [OutputFormat::Markdown, OutputFormat::Html] {
        let text = render(&doc, Some(format)).unwrap();
        assert!(!text.contains("secret = 42"), "{} leaked hidden source", format);
    }
}

#[test]
fn test_inline_round_trip() {
    require_python!();
    let doc = run_commented("#' Result: <%= 2 + 2 %>");
    let text = render(&doc, Some(OutputFormat::Markdown)).unwrap();
    assert!(text.contains("Result: 4"));
    assert!(!text.contains("<%="));
    assert!(!text.contains("%>"));
}

#[test]
fn test_inline_sees_earlier_blocks() {
    require_python!();
    let doc = run_commented("total = sum([1, 2, 3])\n\n#' Total is <%= total %>.<% total = 0 %> Now <%= total %>.\n");
    let md = doc.blocks.iter().find_map(Block::as_markdown).unwrap();
    assert_eq!(md.content, "Total is 6. Now 0.");
}

#[test]
fn test_failed_inline_kept_verbatim() {
    require_python!();
    let doc = run_commented("#' Value: <%= missing_name %>\n");
    let md = doc.blocks.iter().find_map(Block::as_markdown).unwrap();
    assert_eq!(md.content, "Value: <%= missing_name %>");
}

// =============================================================================
// Script environment
// =============================================================================

#[test]
fn test_script_identity() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.py");
    let text = "import sys\nprint(__file__ == sys.argv[0])\nprint(__name__)\n";
    let doc = parse_auto(text, Some(&source));

    let executed = execute(doc, &ExecutorOptions::default()).unwrap();
    assert_eq!(code_blocks(&executed)[0].output.as_deref(), Some("True\n__main__"));
}

#[test]
fn test_script_dir_importable() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("helper_mod.py"), "VALUE = 'from helper'\n").unwrap();
    let source = dir.path().join("doc.md");
    let doc = parse_auto("```python\nimport helper_mod\nhelper_mod.VALUE\n```\n", Some(&source));

    let executed = execute(doc, &ExecutorOptions::default()).unwrap();
    assert_eq!(code_blocks(&executed)[0].output.as_deref(), Some("'from helper'"));
}

#[test]
fn test_working_dir_from_metadata() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("data.txt"), "payload").unwrap();
    let text = format!(
        "---\nworking_dir: {}\n---\n\n```python\nopen('data.txt').read()\n```\n",
        dir.path().display()
    );

    let doc = run_fenced(&text);
    assert_eq!(code_blocks(&doc)[0].output.as_deref(), Some("'payload'"));
}

#[test]
fn test_runs_do_not_share_namespace() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    let mut executor = Executor::start(ExecutorOptions {
        working_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    })
    .unwrap();

    let first = parse("```python\nsecret = 41\n```\n", SourceSyntax::Fenced);
    let executed = executor.run(first).unwrap();
    assert!(executed.namespace.contains_key("secret"));

    let second = parse("```python\nsecret + 1\n```\n", SourceSyntax::Fenced);
    let executed = executor.run(second).unwrap();
    let blocks = code_blocks(&executed);
    assert!(blocks[0].output.is_none());
    assert!(blocks[0]
        .error
        .as_deref()
        .unwrap()
        .starts_with("NameError: name 'secret' is not defined"));
    assert!(!executed.namespace.contains_key("secret"));
    executor.into_interpreter().shutdown().unwrap();
}

#[test]
fn test_missing_interpreter() {
    let options = ExecutorOptions {
        python: "no-such-python-binary-lectern".to_string(),
        ..Default::default()
    };
    let err = execute(parse("```python\n1\n```\n", SourceSyntax::Fenced), &options).unwrap_err();
    assert!(matches!(err, LecternError::Interpreter(_)));
}

// =============================================================================
// Figures
// =============================================================================

#[test]
fn test_figures_saved_and_embedded() {
    require_python!();
    if !matplotlib_available() {
        eprintln!("skipping: matplotlib not available");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("plots.md");
    let text = "```python\nimport matplotlib.pyplot as plt\nplt.plot([1, 2, 3])\nplt.figure()\nplt.plot([3, 2, 1])\n```\n\n```python\nplt.plot([0, 1])\n```\n";
    let doc = parse_auto(text, Some(&source));

    let executed = execute(doc, &ExecutorOptions::default()).unwrap();
    let blocks = code_blocks(&executed);
    let names: Vec<_> = blocks
        .iter()
        .flat_map(|b| b.figures.iter())
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["figure_0.png", "figure_1.png", "figure_2.png"]);
    assert!(dir.path().join("figures").join("figure_2.png").exists());

    let md = render(&executed, Some(OutputFormat::Markdown)).unwrap();
    assert!(md.contains("![Figure](figures/figure_0.png)"));
    let html = render(&executed, Some(OutputFormat::Html)).unwrap();
    assert!(html.contains("data:image/png;base64,"));
}

#[test]
fn test_no_figures_dir_without_plots() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    let doc = parse_auto("```python\nx = 1\n```\n", Some(&dir.path().join("doc.md")));
    execute(doc, &ExecutorOptions::default()).unwrap();
    assert!(!dir.path().join("figures").exists());
}

// =============================================================================
// Binary
// =============================================================================

fn lectern(args: &[&str], cwd: &Path) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_lectern"))
        .args(args)
        .current_dir(cwd)
        .output()
        .unwrap()
}

#[test]
fn test_binary_missing_input_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let out = lectern(&["missing.md"], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("missing.md"));
}

#[test]
fn test_binary_writes_default_output() {
    require_python!();
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("report.py"),
        "#' # Report\n#' Answer: <%= 6 * 7 %>\n\nprint('done')\n",
    )
    .unwrap();

    let out = lectern(&["report.py"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let text = fs::read_to_string(dir.path().join("report.out.md")).unwrap();
    assert!(text.contains("Answer: 42"));
    assert!(text.contains("Output:\n```\ndone\n```"));
}

#[test]
fn test_binary_html_with_unknown_theme_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("doc.md"), "# Title\n").unwrap();

    let out = lectern(
        &["doc.md", "--format", "html", "--code-theme", "invalid-theme-xyz"],
        dir.path(),
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid-theme-xyz"));
    assert!(!dir.path().join("doc.html").exists());
}

#[test]
fn test_binary_notebook_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("nb.ipynb"),
        r#"{"nbformat": 4, "nbformat_minor": 5, "metadata": {},
            "cells": [{"cell_type": "code", "id": "a", "metadata": {}, "source": "x = 1",
                       "execution_count": null, "outputs": []}]}"#,
    )
    .unwrap();

    let out = lectern(&["import-notebook", "nb.ipynb", "-o", "nb.py"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let out = lectern(&["export-notebook", "nb.py", "-o", "back.ipynb"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let back = fs::read_to_string(dir.path().join("back.ipynb")).unwrap();
    assert!(back.contains("\"x = 1\""));
}
