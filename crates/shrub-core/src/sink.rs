//! Rendering sinks: where composed documents are loaded for display.
//!
//! A sink stands for an isolated browsing context. It may execute the
//! document's scripts and show modal dialogs, and has no other capability:
//! no same-origin access, no top navigation, no popups, no forms.
//!
//! Loading is fire-and-forget. `load` returns nothing and the compositor
//! never waits for or inspects the outcome, so a sink that can fail (for
//! example one that writes to disk) handles and logs its own errors.

/// Sandbox tokens granted to the preview context, in iframe attribute form.
pub const PREVIEW_SANDBOX: &str = "allow-scripts allow-modals";

/// A destination for composed documents.
pub trait RenderSink {
    /// Replaces whatever the context shows with `document`.
    fn load(&mut self, document: &str);
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn load(&mut self, document: &str) {
        (**self).load(document)
    }
}

/// A sink that keeps the document it was last asked to load.
///
/// Used by headless sessions and tests. Only the current document is held,
/// plus a count of loads.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    current: Option<String>,
    loads: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document currently shown, if any was loaded.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Returns how many times `load` was called.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

impl RenderSink for MemorySink {
    fn load(&mut self, document: &str) {
        self.current = Some(document.to_string());
        self.loads += 1;
    }
}
