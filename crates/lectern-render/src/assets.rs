//! Static pieces of the HTML page.

/// Page title when neither metadata nor the source path supplies one.
pub const DEFAULT_TITLE: &str = "Lectern Report";

/// Where the footer links to.
pub const PROJECT_URL: &str = env!("CARGO_PKG_REPOSITORY");

/// Stylesheet for the page layout; theme CSS is appended after it.
pub const BASE_CSS: &str = r#"body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
    line-height: 1.6;
    max-width: 900px;
    margin: 0 auto;
    padding: 2rem;
    color: #333;
}
pre {
    background: #f5f5f5;
    padding: 1rem;
    border-radius: 4px;
    overflow-x: auto;
}
code {
    background: #f5f5f5;
    padding: 0.2rem 0.4rem;
    border-radius: 3px;
    font-family: 'Courier New', Courier, monospace;
}
pre code {
    padding: 0;
    background: transparent;
}
.code-block {
    margin: 1.5rem 0;
}
.code-input {
    border-radius: 4px 4px 0 0;
    margin: 0;
}
.code-input pre {
    margin: 0;
}
.code-output {
    background: #f8f8f8;
    border: 1px solid #e1e4e8;
    border-top: none;
    padding: 1rem;
    border-radius: 0 0 4px 4px;
    margin: 0;
}
.error {
    color: #d73a49;
    background: #ffeef0;
    padding: 1rem;
    border-radius: 4px;
    border: 1px solid #ffdce0;
}
img {
    max-width: 100%;
    height: auto;
}
.lectern-footer {
    text-align: center;
    margin-top: 3rem;
    padding-top: 2rem;
    border-top: 1px solid #e1e4e8;
    font-size: 0.875rem;
    color: #6c757d;
}
.lectern-footer a {
    color: #0969da;
    text-decoration: none;
}
.lectern-footer a:hover {
    text-decoration: underline;
}
"#;

/// The attribution footer.
pub fn footer() -> String {
    format!(
        "<footer class=\"lectern-footer\">\nMade with <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Lectern</a>\n</footer>",
        PROJECT_URL
    )
}
