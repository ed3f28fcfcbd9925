//! Inline expression resolution for markdown prose.

use std::collections::HashMap;

use lectern_core::InlineExpression;
use lectern_parser::{extract_inline, substitute};
use log::debug;

use crate::interpreter::{ExecError, Interpreter, ValueMode};

/// Run every marker in `text` and splice in the results.
///
/// Markers are resolved left to right against the shared namespace. A
/// marker whose code raises is left in the text as written.
pub fn resolve_inline<I: Interpreter + ?Sized>(interpreter: &mut I, text: &str) -> String {
    let markers = extract_inline(text);
    if markers.is_empty() {
        return text.to_string();
    }

    let mut replacements = HashMap::with_capacity(markers.len());
    for marker in &markers {
        match resolve_marker(interpreter, marker) {
            Ok(replacement) => {
                replacements.insert(marker.position, replacement);
            }
            Err(e) => debug!("Keeping inline marker '{}': {}", marker.expression, e),
        }
    }

    substitute(text, &replacements)
}

fn resolve_marker<I: Interpreter + ?Sized>(
    interpreter: &mut I,
    marker: &InlineExpression,
) -> Result<String, ExecError> {
    if marker.is_statement {
        let outcome = interpreter.execute(&marker.expression)?;
        discard_output(&marker.expression, &outcome.stdout);
        outcome.value?;
        Ok(String::new())
    } else {
        let outcome = interpreter.evaluate(&marker.expression, ValueMode::Str)?;
        discard_output(&marker.expression, &outcome.stdout);
        Ok(outcome.value?.unwrap_or_default())
    }
}

fn discard_output(code: &str, stdout: &str) {
    if !stdout.is_empty() {
        debug!("Discarding output of inline '{}': {}", code, stdout.trim_end());
    }
}
