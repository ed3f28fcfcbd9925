//! Figure references: relative links for Markdown, data URIs for HTML.

use std::path::{Component, Path};

use base64::{engine::general_purpose::STANDARD, Engine};
use log::debug;

/// MIME type from the file extension, PNG when unknown.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Read `path` and encode it as a `data:` URI, or `None` if unreadable.
pub fn data_uri(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(format!(
            "data:{};base64,{}",
            mime_type(path),
            STANDARD.encode(bytes)
        )),
        Err(e) => {
            debug!("Linking figure {} instead of embedding: {}", path.display(), e);
            None
        }
    }
}

/// A forward-slash link to `path`, relative to `base` when it lies below it.
pub fn relative_link(path: &Path, base: Option<&Path>) -> String {
    let relative = base
        .and_then(|base| path.strip_prefix(base).ok())
        .unwrap_or(path);

    let mut link = String::new();
    for component in relative.components() {
        match component {
            Component::RootDir => link.push('/'),
            Component::CurDir => continue,
            other => {
                if !link.is_empty() && !link.ends_with('/') {
                    link.push('/');
                }
                link.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    link
}
