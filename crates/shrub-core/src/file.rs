//! Source files held by the store.
//!
//! A `SourceFile` is one named, typed text buffer. Its `name` is the key
//! the store uses for uniqueness, selection and deletion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The kind of buffer, which decides how the compositor treats it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// HTML; the first one becomes the composition root
    #[serde(rename = "html")]
    Markup,
    /// CSS; injected as an inline stylesheet
    #[serde(rename = "css")]
    Style,
    /// JavaScript; injected as an inline script
    #[serde(rename = "javascript")]
    Script,
}

impl Language {
    /// All languages, in the order the file dialog offers them.
    pub const ALL: [Language; 3] = [Language::Markup, Language::Style, Language::Script];

    /// Returns the file name suffix appended to bare names.
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Markup => ".html",
            Language::Style => ".css",
            Language::Script => ".js",
        }
    }

    /// Returns the identifier the code-editing widget expects.
    pub fn editor_id(&self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "javascript",
        }
    }

    /// Detects the language from a bare extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "html" => Some(Language::Markup),
            "css" => Some(Language::Style),
            "js" => Some(Language::Script),
            _ => None,
        }
    }

    /// Detects the language of a path from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Qualifies a bare name with this language's suffix.
    ///
    /// Names that already end with the suffix are returned unchanged, so
    /// `index.html` and `index` both become `index.html`.
    pub fn qualify(&self, name: &str) -> String {
        let ext = self.extension();
        if name.ends_with(ext) {
            name.to_string()
        } else {
            format!("{name}{ext}")
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.editor_id())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "markup" => Ok(Language::Markup),
            "css" | "style" => Ok(Language::Style),
            "javascript" | "js" | "script" => Ok(Language::Script),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// One named, typed text buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    name: String,
    language: Language,
    content: String,
}

impl SourceFile {
    /// Creates a file with an already-qualified name.
    pub fn new(name: impl Into<String>, language: Language, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language,
            content: content.into(),
        }
    }

    /// Returns the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the raw text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the raw text.
    pub(crate) fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }
}
