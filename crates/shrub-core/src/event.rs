//! Event system for playground notifications.
//!
//! Presentation surfaces (file list, tabs, editor widget, preview pane)
//! subscribe to a `tokio::sync::broadcast` channel instead of holding
//! references into the playground. Events are emitted after the store has
//! been mutated and the preview recomposed, so a subscriber that reads the
//! playground in response always sees the new state.

use tokio::sync::broadcast;

use crate::playground::{ActiveView, EditorTheme};

/// Things that happened in the playground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundEvent {
    // File events
    /// A file was added and made active
    FileAdded(String),
    /// A file became the active file
    FileSelected(String),
    /// A file's content changed
    FileChanged(String),
    /// A file was removed
    FileDeleted(String),

    // Preview events
    /// The composed document changed and was handed to the sink
    PreviewUpdated,
    /// The last document was reloaded on request
    PreviewRefreshed,

    // Layout events
    /// Editor theme switched
    ThemeChanged(EditorTheme),
    /// Compact layout signal flipped
    LayoutChanged { compact: bool },
    /// The editor widget must recompute its layout
    LayoutRefreshRequested,
    /// Compact layout switched between editor and preview pane
    ViewChanged(ActiveView),
}

/// Event bus for broadcasting playground events.
pub struct EventBus {
    sender: broadcast::Sender<PlaygroundEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: PlaygroundEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PlaygroundEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Helper for consuming events asynchronously.
///
/// ## Example
///
/// ```ignore
/// let mut handler = EventHandler::new(playground.subscribe());
///
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         if let PlaygroundEvent::LayoutRefreshRequested = event {
///             editor_widget.layout();
///         }
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<PlaygroundEvent>,
}

impl EventHandler {
    pub fn new(receiver: broadcast::Receiver<PlaygroundEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event; `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<PlaygroundEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next event if one is already queued.
    pub fn try_next(&mut self) -> Option<PlaygroundEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(_) => return None,
            }
        }
    }
}
