//! Playground orchestration.
//!
//! `Playground` is the one owned instance every presentation surface talks
//! to. It holds the file store and the compositor and wires them together:
//! each store mutation is followed, in the same call, by a recomposition of
//! the preview and then by event emission. Callers never see a state where
//! the store has changed but the preview has not been recomputed.
//!
//! ## Thread Safety
//!
//! `Playground` is owned by a single thread. Mutations take `&mut self`, so
//! the store has exactly one writer, and the compositor reads it on the same
//! call stack.

use serde::{Deserialize, Serialize};

use crate::compose::{ComposedDocument, Compositor};
use crate::config::{Config, EditorConfig};
use crate::defaults::default_files;
use crate::event::{EventBus, PlaygroundEvent};
use crate::file::{Language, SourceFile};
use crate::sink::RenderSink;
use crate::store::FileStore;
use crate::CoreResult;

/// Color theme of the code-editing widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorTheme {
    Light,
    #[default]
    Dark,
}

impl EditorTheme {
    /// Returns the other theme.
    pub fn toggle(self) -> Self {
        match self {
            EditorTheme::Light => EditorTheme::Dark,
            EditorTheme::Dark => EditorTheme::Light,
        }
    }

    /// Theme name understood by the editor widget.
    pub fn widget_theme(self) -> &'static str {
        match self {
            EditorTheme::Light => "vs-light",
            EditorTheme::Dark => "vs-dark",
        }
    }
}

/// Which pane the compact layout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Editor,
    Preview,
}

/// Options handed to the code-editing widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub font_size: u16,
    pub line_numbers: bool,
    pub folding: bool,
    pub glyph_margin: bool,
    pub padding_top: u16,
    pub tab_size: usize,
    pub word_wrap: bool,
    pub minimap: bool,
    pub scroll_beyond_last_line: bool,
}

impl EditorOptions {
    /// Derives widget options for the compact or side-by-side layout.
    ///
    /// Compact screens get a larger font and lose the gutter decorations.
    pub fn for_layout(compact: bool, config: &EditorConfig) -> Self {
        Self {
            font_size: if compact { 16 } else { 14 },
            line_numbers: !compact,
            folding: !compact,
            glyph_margin: !compact,
            padding_top: if compact { 10 } else { 4 },
            tab_size: config.tab_size,
            word_wrap: config.word_wrap,
            minimap: false,
            scroll_beyond_last_line: false,
        }
    }
}

/// The playground state: files, preview and editor session.
pub struct Playground<S> {
    /// Source files and active-file session
    store: FileStore,

    /// Keeps the sink in sync with `store`
    compositor: Compositor<S>,

    config: Config,

    /// Event bus for notifications
    event_bus: EventBus,

    theme: EditorTheme,

    /// Compact (mobile) layout signal
    compact: bool,

    /// Pane shown in compact layout
    view: ActiveView,
}

impl<S: RenderSink> Playground<S> {
    /// Creates a playground with the default config and starter files.
    pub fn new(sink: S) -> Self {
        Self::with_config(Config::default(), sink)
    }

    /// Creates a playground from a config, seeding the starter files if the
    /// config asks for them.
    pub fn with_config(config: Config, sink: S) -> Self {
        let store = if config.files.seed_defaults {
            FileStore::with_files(default_files())
        } else {
            FileStore::new()
        };
        Self::with_store(store, config, sink)
    }

    /// Creates a playground around an existing store.
    ///
    /// The initial document is composed and loaded right away.
    pub fn with_store(store: FileStore, config: Config, sink: S) -> Self {
        let compositor = Compositor::new(sink).with_auto_refresh(config.preview.auto_refresh);
        let mut playground = Self {
            store,
            compositor,
            theme: config.editor.theme,
            config,
            event_bus: EventBus::new(),
            compact: false,
            view: ActiveView::default(),
        };
        playground.compositor.recompute(playground.store.list_files());
        playground
    }

    // ==================== File Operations ====================

    /// Returns files in insertion order.
    pub fn list_files(&self) -> &[SourceFile] {
        self.store.list_files()
    }

    /// Returns the file store.
    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Returns the file being edited.
    pub fn active_file(&self) -> Option<&SourceFile> {
        self.store.active()
    }

    /// Adds a file and makes it active.
    pub fn add_file(&mut self, name: &str, language: Language, content: &str) -> CoreResult<()> {
        let name = self.store.add_file(name, language, content)?.name().to_string();
        self.store_changed();
        self.emit(PlaygroundEvent::FileAdded(name));
        Ok(())
    }

    /// Makes the named file active.
    pub fn select_file(&mut self, name: &str) -> CoreResult<()> {
        self.store.select_file(name)?;
        self.store_changed();
        self.emit(PlaygroundEvent::FileSelected(name.to_string()));
        Ok(())
    }

    /// Replaces the active file's content, as reported by the editor widget.
    pub fn update_active_content(&mut self, content: &str) {
        let Some(file) = self.store.update_active_content(content) else {
            tracing::debug!("Edit dropped, no active file");
            return;
        };
        let name = file.name().to_string();
        self.store_changed();
        self.emit(PlaygroundEvent::FileChanged(name));
    }

    /// Replaces a file's content by name without changing the active file.
    pub fn update_file(&mut self, name: &str, content: &str) -> CoreResult<()> {
        self.store.update_content(name, content)?;
        self.store_changed();
        self.emit(PlaygroundEvent::FileChanged(name.to_string()));
        Ok(())
    }

    /// Removes the named file.
    pub fn delete_file(&mut self, name: &str) -> CoreResult<()> {
        self.store.delete_file(name)?;
        self.store_changed();
        self.emit(PlaygroundEvent::FileDeleted(name.to_string()));
        Ok(())
    }

    // ==================== Preview ====================

    /// Reloads the last composed document into the sink.
    pub fn refresh(&mut self) {
        self.compositor.refresh();
        self.emit(PlaygroundEvent::PreviewRefreshed);
    }

    /// Returns the last composed document.
    pub fn document(&self) -> Option<&ComposedDocument> {
        self.compositor.document()
    }

    /// Returns a copy of the current document, for saving elsewhere.
    pub fn export(&self) -> ComposedDocument {
        let document = self.document().cloned().unwrap_or_default();
        tracing::info!("Exporting preview ({} bytes)", document.as_str().len());
        document
    }

    /// Returns the rendering sink.
    pub fn sink(&self) -> &S {
        self.compositor.sink()
    }

    /// Returns the rendering sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        self.compositor.sink_mut()
    }

    // ==================== Layout ====================

    /// Returns the editor theme.
    pub fn theme(&self) -> EditorTheme {
        self.theme
    }

    /// Switches between light and dark.
    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggle());
    }

    /// Sets the editor theme.
    pub fn set_theme(&mut self, theme: EditorTheme) {
        if self.theme != theme {
            self.theme = theme;
            self.emit(PlaygroundEvent::ThemeChanged(theme));
            self.emit(PlaygroundEvent::LayoutRefreshRequested);
        }
    }

    /// Returns true when the compact layout is in use.
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Updates the compact layout signal.
    pub fn set_compact(&mut self, compact: bool) {
        if self.compact != compact {
            self.compact = compact;
            self.emit(PlaygroundEvent::LayoutChanged { compact });
            self.emit(PlaygroundEvent::LayoutRefreshRequested);
        }
    }

    /// Derives the compact signal from the viewport width.
    pub fn set_viewport_width(&mut self, width: u32) {
        self.set_compact(self.config.editor.is_compact(width));
    }

    /// Returns the pane shown in compact layout.
    pub fn view(&self) -> ActiveView {
        self.view
    }

    /// Switches the compact layout between editor and preview.
    pub fn set_view(&mut self, view: ActiveView) {
        if self.view != view {
            self.view = view;
            self.emit(PlaygroundEvent::ViewChanged(view));
            if view == ActiveView::Editor {
                self.emit(PlaygroundEvent::LayoutRefreshRequested);
            }
        }
    }

    /// Returns the widget options for the current layout.
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions::for_layout(self.compact, &self.config.editor)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Events ====================

    /// Subscribes to playground events.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<PlaygroundEvent> {
        self.event_bus.subscribe()
    }

    fn emit(&self, event: PlaygroundEvent) {
        self.event_bus.emit(event);
    }

    fn store_changed(&mut self) {
        if self.compositor.recompute(self.store.list_files()) {
            self.emit(PlaygroundEvent::PreviewUpdated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_JS;
    use crate::event::EventHandler;
    use crate::sink::MemorySink;
    use crate::CoreError;

    fn playground() -> Playground<MemorySink> {
        Playground::new(MemorySink::new())
    }

    fn drain(handler: &mut EventHandler) -> Vec<PlaygroundEvent> {
        std::iter::from_fn(|| handler.try_next()).collect()
    }

    #[test]
    fn test_starts_with_defaults_loaded() {
        let pg = playground();
        let names: Vec<_> = pg.list_files().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["index.html", "styles.css", "script.js"]);
        assert_eq!(pg.active_file().unwrap().name(), "index.html");
        assert_eq!(pg.sink().load_count(), 1);
    }

    #[test]
    fn test_editing_style_updates_preview() {
        let mut pg = playground();
        pg.select_file("styles.css").unwrap();
        pg.update_active_content("body { margin: 10px }");

        let doc = pg.sink().current().unwrap().to_string();
        assert!(doc.contains("<style>body { margin: 10px }</style></head>"));
        assert_eq!(doc.matches("<style>").count(), 1);
        assert!(doc.contains(&format!("<script>{DEFAULT_JS}</script></body>")));
        assert!(doc.contains(r#"<button id="demo-button">Click me!</button>"#));
        assert_eq!(pg.document().unwrap().as_str(), doc);
    }

    #[test]
    fn test_delete_active_falls_back_to_first() {
        let mut pg = Playground::with_store(
            FileStore::with_files([
                SourceFile::new("a.html", Language::Markup, ""),
                SourceFile::new("b.css", Language::Style, ""),
                SourceFile::new("c.js", Language::Script, ""),
            ]),
            Config::default(),
            MemorySink::new(),
        );
        pg.select_file("b.css").unwrap();
        pg.delete_file("b.css").unwrap();
        assert_eq!(pg.active_file().unwrap().name(), "a.html");
    }

    #[test]
    fn test_duplicate_add_changes_nothing() {
        let mut pg = playground();
        let mut events = EventHandler::new(pg.subscribe());

        let err = pg.add_file("styles", Language::Style, "").unwrap_err();
        assert!(matches!(err, CoreError::DuplicateName(_)));
        assert_eq!(pg.list_files().len(), 3);
        assert_eq!(pg.sink().load_count(), 1);
        assert!(drain(&mut events).is_empty());
    }

    #[test]
    fn test_events_follow_recomposition() {
        let mut pg = playground();
        let mut events = EventHandler::new(pg.subscribe());

        pg.update_active_content("<head></head><body>new</body>");
        assert_eq!(
            drain(&mut events),
            [
                PlaygroundEvent::PreviewUpdated,
                PlaygroundEvent::FileChanged("index.html".into()),
            ]
        );
    }

    #[test]
    fn test_select_does_not_reload_sink() {
        let mut pg = playground();
        pg.select_file("script.js").unwrap();
        assert_eq!(pg.sink().load_count(), 1);
        assert_eq!(pg.active_file().unwrap().language(), Language::Script);
    }

    #[test]
    fn test_second_style_file_is_ignored() {
        let mut pg = playground();
        pg.add_file("extra", Language::Style, "h1 { color: red }").unwrap();
        pg.update_active_content("h1 { color: blue }");

        assert_eq!(pg.active_file().unwrap().name(), "extra.css");
        assert_eq!(pg.sink().load_count(), 1);
        assert!(!pg.export().as_str().contains("color: blue"));
    }

    #[test]
    fn test_deleting_root_empties_preview() {
        let mut pg = playground();
        pg.delete_file("index.html").unwrap();
        assert_eq!(pg.sink().current(), Some(""));
        assert!(pg.export().is_empty());
    }

    #[test]
    fn test_refresh_reloads_same_document() {
        let mut pg = playground();
        let before = pg.sink().current().unwrap().to_string();
        pg.refresh();
        assert_eq!(pg.sink().load_count(), 2);
        assert_eq!(pg.sink().current(), Some(before.as_str()));
    }

    #[test]
    fn test_missing_file_errors() {
        let mut pg = playground();
        assert!(matches!(pg.select_file("x.js"), Err(CoreError::NotFound(_))));
        assert!(matches!(pg.delete_file("x.js"), Err(CoreError::NotFound(_))));
        assert!(matches!(pg.update_file("x.js", ""), Err(CoreError::NotFound(_))));
    }

    #[test]
    fn test_without_seed_defaults() {
        let mut config = Config::default();
        config.files.seed_defaults = false;
        let mut pg = Playground::with_config(config, MemorySink::new());

        assert!(pg.list_files().is_empty());
        assert!(pg.active_file().is_none());
        pg.update_active_content("ignored");
        assert_eq!(pg.sink().current(), Some(""));
    }

    #[test]
    fn test_theme_toggle_requests_layout() {
        let mut pg = playground();
        let mut events = EventHandler::new(pg.subscribe());

        pg.toggle_theme();
        assert_eq!(pg.theme(), EditorTheme::Light);
        assert_eq!(pg.theme().widget_theme(), "vs-light");
        assert_eq!(
            drain(&mut events),
            [
                PlaygroundEvent::ThemeChanged(EditorTheme::Light),
                PlaygroundEvent::LayoutRefreshRequested,
            ]
        );
    }

    #[test]
    fn test_compact_layout_signal() {
        let mut pg = playground();
        let mut events = EventHandler::new(pg.subscribe());

        pg.set_viewport_width(1280);
        assert!(drain(&mut events).is_empty());

        pg.set_viewport_width(400);
        assert!(pg.is_compact());
        assert_eq!(pg.editor_options().font_size, 16);
        assert!(!pg.editor_options().line_numbers);
        assert_eq!(
            drain(&mut events),
            [
                PlaygroundEvent::LayoutChanged { compact: true },
                PlaygroundEvent::LayoutRefreshRequested,
            ]
        );
    }

    #[test]
    fn test_view_switch() {
        let mut pg = playground();
        let mut events = EventHandler::new(pg.subscribe());

        pg.set_view(ActiveView::Preview);
        pg.set_view(ActiveView::Editor);
        assert_eq!(
            drain(&mut events),
            [
                PlaygroundEvent::ViewChanged(ActiveView::Preview),
                PlaygroundEvent::ViewChanged(ActiveView::Editor),
                PlaygroundEvent::LayoutRefreshRequested,
            ]
        );
    }

    #[test]
    fn test_desktop_editor_options() {
        let options = EditorOptions::for_layout(false, &EditorConfig::default());
        assert_eq!(options.font_size, 14);
        assert!(options.line_numbers && options.folding && options.glyph_margin);
        assert_eq!(options.padding_top, 4);
        assert_eq!(options.tab_size, 2);
        assert!(options.word_wrap);
    }
}
