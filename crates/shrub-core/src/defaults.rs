//! The files a fresh playground starts with.

use crate::file::{Language, SourceFile};

/// Starter markup with a button the starter script wires up.
pub const DEFAULT_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Shrub Editor</title>
  <meta charset="UTF-8" />
</head>
<body>
  <div class="container">
    <h1>Welcome to Shrub Editor</h1>
    <p>Start editing to see your changes in real-time!</p>
    <button id="demo-button">Click me!</button>
  </div>
</body>
</html>"#;

pub const DEFAULT_CSS: &str = r#"body {
  font-family: system-ui, -apple-system, BlinkMacSystemFont, sans-serif;
  background: linear-gradient(135deg, #1a1a2e, #16213e);
  color: #e6e6e6;
  margin: 0;
  padding: 20px;
  height: 100vh;
}

.container {
  max-width: 800px;
  margin: 0 auto;
  padding: 2rem;
  background-color: rgba(255, 255, 255, 0.05);
  border-radius: 8px;
  box-shadow: 0 4px 20px rgba(0, 0, 0, 0.2);
}

h1 {
  color: #4cc9f0;
  margin-bottom: 1rem;
}

p {
  line-height: 1.6;
  margin-bottom: 1.5rem;
}

button {
  background-color: #4361ee;
  color: white;
  border: none;
  padding: 10px 20px;
  border-radius: 4px;
  cursor: pointer;
  font-weight: 600;
  transition: all 0.2s ease;
}

button:hover {
  background-color: #3a0ca3;
  transform: translateY(-2px);
  box-shadow: 0 4px 8px rgba(0, 0, 0, 0.2);
}"#;

pub const DEFAULT_JS: &str = r#"document.getElementById('demo-button').addEventListener('click', function() {
  alert('Hello from Shrub Editor!');
});"#;

/// Returns `index.html`, `styles.css` and `script.js`, in that order.
pub fn default_files() -> Vec<SourceFile> {
    vec![
        SourceFile::new("index.html", Language::Markup, DEFAULT_HTML),
        SourceFile::new("styles.css", Language::Style, DEFAULT_CSS),
        SourceFile::new("script.js", Language::Script, DEFAULT_JS),
    ]
}
