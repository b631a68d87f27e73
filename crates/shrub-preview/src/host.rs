//! Host page that isolates the composed document in a sandboxed iframe.

use shrub_core::PREVIEW_SANDBOX;

/// A standalone HTML page embedding a preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPage {
    /// `<title>` of the outer page
    pub title: String,
}

impl HostPage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }

    /// Wraps `document` in the sandboxed iframe.
    ///
    /// The document travels in `srcdoc`, so it never shares an origin with the
    /// host page and cannot navigate it.
    pub fn render(&self, document: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8" />
  <title>{title}</title>
  <style>html, body {{ margin: 0; height: 100%; background: #ffffff; }} iframe {{ border: 0; width: 100%; height: 100%; }}</style>
</head>
<body>
  <iframe title="preview" sandbox="{sandbox}" srcdoc="{srcdoc}"></iframe>
</body>
</html>
"#,
            title = escape_attribute(&self.title),
            sandbox = PREVIEW_SANDBOX,
            srcdoc = escape_attribute(document),
        )
    }
}

impl Default for HostPage {
    fn default() -> Self {
        Self::new("Preview")
    }
}

/// Escapes text for use inside a double-quoted HTML attribute or element text.
pub fn escape_attribute(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
