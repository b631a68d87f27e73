//! Preview composition.
//!
//! `compose` turns the current file set into one HTML document:
//!
//! 1. The first markup file (insertion order) is the root. Without one there
//!    is nothing to render.
//! 2. The first style file and the first script file are used. Any further
//!    files of those kinds are ignored.
//! 3. `<style>..</style>` goes right before the first `</head>`, then
//!    `<script>..</script>` right before the first `</body>`. A missing tag
//!    means that block is left out; a repeated tag only gets one injection.
//!
//! Injection is literal text insertion. Nothing in the style or script content
//! is interpreted, escaped or validated.
//!
//! ## Learning: Pure Core, Effectful Shell
//!
//! `compose` borrows a slice of files and returns a fresh value. It touches
//! no sink and keeps no state, so the same files always give the same
//! document and it can be tested without any setup.
//!
//! `Compositor` is the thin stateful layer on top. It remembers the last
//! document and owns the only side effect, `RenderSink::load`. Generic over
//! `S: RenderSink`, it is monomorphized for `MemorySink` in tests and boxed
//! as `Box<dyn RenderSink>` by the CLI.

use std::fmt;

use crate::file::{Language, SourceFile};
use crate::sink::RenderSink;

const CLOSE_HEAD: &str = "</head>";
const CLOSE_BODY: &str = "</body>";

/// A single renderable HTML string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ComposedDocument(String);

impl ComposedDocument {
    /// Returns the document text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the document, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns true for the empty document shown when there is no root.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ComposedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComposedDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Assembles the preview document from `files`.
///
/// Returns `None` when there is no markup file to act as the root.
pub fn compose(files: &[SourceFile]) -> Option<ComposedDocument> {
    let first = |language: Language| files.iter().find(|f| f.language() == language);

    let root = first(Language::Markup)?;
    let mut html = root.content().to_string();

    if let Some(style) = first(Language::Style) {
        html = insert_before_first(&html, CLOSE_HEAD, &format!("<style>{}</style>", style.content()));
    }

    if let Some(script) = first(Language::Script) {
        html = insert_before_first(&html, CLOSE_BODY, &format!("<script>{}</script>", script.content()));
    }

    Some(ComposedDocument(html))
}

fn insert_before_first(haystack: &str, tag: &str, block: &str) -> String {
    match haystack.find(tag) {
        Some(idx) => {
            let mut out = String::with_capacity(haystack.len() + block.len());
            out.push_str(&haystack[..idx]);
            out.push_str(block);
            out.push_str(&haystack[idx..]);
            out
        }
        None => haystack.to_string(),
    }
}

/// Keeps a rendering sink in sync with the file set.
///
/// The compositor remembers the last document it produced. `recompute` only
/// reloads the sink when that document actually changed; `refresh` reloads
/// the remembered document as is.
pub struct Compositor<S> {
    sink: S,

    /// Last computed document; `None` until the first recompute
    last: Option<ComposedDocument>,

    /// Whether a changed document is pushed to the sink immediately
    auto_refresh: bool,
}

impl<S: RenderSink> Compositor<S> {
    /// Creates a compositor that reloads `sink` on every change.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            last: None,
            auto_refresh: true,
        }
    }

    /// Sets whether changed documents are loaded without an explicit refresh.
    pub fn with_auto_refresh(mut self, auto_refresh: bool) -> Self {
        self.auto_refresh = auto_refresh;
        self
    }

    /// Recomposes from scratch and loads the result if it differs from the
    /// previous document.
    ///
    /// With no markup root the sink is given the empty document. Returns true
    /// if the document changed.
    pub fn recompute(&mut self, files: &[SourceFile]) -> bool {
        let document = compose(files).unwrap_or_default();

        if self.last.as_ref() == Some(&document) {
            tracing::trace!("Preview unchanged");
            return false;
        }

        tracing::debug!("Preview recomposed ({} bytes)", document.as_str().len());
        if self.auto_refresh {
            self.sink.load(document.as_str());
        }
        self.last = Some(document);
        true
    }

    /// Reloads the last computed document without recomposing.
    ///
    /// Does nothing before the first recompute.
    pub fn refresh(&mut self) {
        if let Some(document) = &self.last {
            self.sink.load(document.as_str());
        }
    }

    /// Returns the last computed document.
    pub fn document(&self) -> Option<&ComposedDocument> {
        self.last.as_ref()
    }

    /// Returns the rendering sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the rendering sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn html(content: &str) -> SourceFile {
        SourceFile::new("index.html", Language::Markup, content)
    }

    fn css(name: &str, content: &str) -> SourceFile {
        SourceFile::new(name, Language::Style, content)
    }

    fn js(name: &str, content: &str) -> SourceFile {
        SourceFile::new(name, Language::Script, content)
    }

    const PAGE: &str = "<html><head><title>t</title></head><body><p>x</p></body></html>";

    #[test]
    fn test_injects_style_and_script() {
        let doc = compose(&[html(PAGE), css("a.css", "p{}"), js("a.js", "go()")]).unwrap();
        assert_eq!(
            doc.as_str(),
            "<html><head><title>t</title><style>p{}</style></head>\
             <body><p>x</p><script>go()</script></body></html>"
        );
    }

    #[test]
    fn test_markup_only_is_unchanged() {
        let doc = compose(&[html(PAGE)]).unwrap();
        assert_eq!(doc.as_str(), PAGE);
    }

    #[test]
    fn test_no_markup_root() {
        assert!(compose(&[]).is_none());
        assert!(compose(&[css("a.css", "p{}"), js("a.js", "")]).is_none());
    }

    #[test]
    fn test_first_head_only() {
        let root = "<head></head><head></head><body></body>";
        let doc = compose(&[html(root), css("a.css", "b{}")]).unwrap();
        assert_eq!(doc.as_str(), "<head><style>b{}</style></head><head></head><body></body>");
        assert_eq!(doc.as_str().matches("<style>").count(), 1);
    }

    #[test]
    fn test_first_body_only() {
        let root = "<body></body><body></body>";
        let doc = compose(&[html(root), js("a.js", "1")]).unwrap();
        assert_eq!(doc.as_str(), "<body><script>1</script></body><body></body>");
    }

    #[test]
    fn test_missing_tags_are_noop() {
        let root = "<p>fragment</p>";
        let doc = compose(&[html(root), css("a.css", "p{}"), js("a.js", "x()")]).unwrap();
        assert_eq!(doc.as_str(), root);
    }

    #[test]
    fn test_first_of_each_kind_wins() {
        let files = [
            css("one.css", "one"),
            html("<head></head><body></body>"),
            js("one.js", "1"),
            SourceFile::new("other.html", Language::Markup, "ignored"),
            css("two.css", "two"),
            js("two.js", "2"),
        ];
        let doc = compose(&files).unwrap();
        assert_eq!(
            doc.as_str(),
            "<head><style>one</style></head><body><script>1</script></body>"
        );
    }

    #[test]
    fn test_replacement_text_is_literal() {
        let doc = compose(&[html("<head></head>"), css("a.css", "a::after{content:'$&'}")]).unwrap();
        assert_eq!(doc.as_str(), "<head><style>a::after{content:'$&'}</style></head>");
    }

    #[test]
    fn test_script_lands_before_body_tag_inside_style() {
        // Insertion is sequential: the script goes before the first `</body>`
        // of the text produced by the style step.
        let files = [
            html("<head></head><body></body>"),
            css("a.css", "/* </body> */"),
            js("a.js", "s"),
        ];
        let doc = compose(&files).unwrap();
        assert_eq!(
            doc.as_str(),
            "<head><style>/* <script>s</script></body> */</style></head><body></body>"
        );
    }

    #[test]
    fn test_compose_is_deterministic() {
        let files = [html(PAGE), css("a.css", "p{}"), js("a.js", "go()")];
        assert_eq!(compose(&files), compose(&files));
    }

    #[test]
    fn test_compositor_loads_only_on_change() {
        let files = vec![html(PAGE), css("a.css", "p{}")];
        let mut compositor = Compositor::new(MemorySink::new());

        assert!(compositor.recompute(&files));
        assert!(!compositor.recompute(&files));
        assert_eq!(compositor.sink().load_count(), 1);

        let files = vec![html(PAGE), css("a.css", "p{color:red}")];
        assert!(compositor.recompute(&files));
        assert_eq!(compositor.sink().load_count(), 2);
    }

    #[test]
    fn test_compositor_refresh_reuses_last_document() {
        let files = vec![html(PAGE)];
        let mut compositor = Compositor::new(MemorySink::new());

        compositor.refresh();
        assert_eq!(compositor.sink().load_count(), 0);

        compositor.recompute(&files);
        compositor.refresh();
        compositor.refresh();

        let sink = compositor.sink();
        assert_eq!(sink.load_count(), 3);
        assert_eq!(sink.current(), Some(PAGE));
    }

    #[test]
    fn test_compositor_without_root_shows_empty_document() {
        let mut compositor = Compositor::new(MemorySink::new());
        compositor.recompute(&[html(PAGE)]);
        compositor.recompute(&[css("a.css", "p{}")]);

        assert_eq!(compositor.sink().current(), Some(""));
        assert!(compositor.document().unwrap().is_empty());
    }

    #[test]
    fn test_compositor_manual_refresh_mode() {
        let mut compositor = Compositor::new(MemorySink::new()).with_auto_refresh(false);
        compositor.recompute(&[html(PAGE)]);
        assert_eq!(compositor.sink().load_count(), 0);

        compositor.refresh();
        assert_eq!(compositor.sink().current(), Some(PAGE));
    }
}
