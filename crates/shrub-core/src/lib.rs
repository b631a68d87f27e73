//! # Shrub Core
//!
//! File store, preview compositor and session state for the playground.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       Playground                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌──────────────────────┐ │
//! │  │  FileStore  │ │   Config    │ │      EventBus        │ │
//! │  └─────────────┘ └─────────────┘ └──────────────────────┘ │
//! │         │ (store changed)                                 │
//! │  ┌──────┴──────────────────────────────────┐              │
//! │  │               Compositor                 │              │
//! │  │  compose(files) ──► ComposedDocument     │              │
//! │  │                         │                │              │
//! │  │                    RenderSink::load      │              │
//! │  └─────────────────────────────────────────┘              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation of the store runs to completion before the compositor
//! reads it, so the preview always reflects post-mutation state.

pub mod compose;
pub mod config;
pub mod defaults;
pub mod event;
pub mod file;
pub mod playground;
pub mod sink;
pub mod store;
pub mod workspace;

pub use compose::{ComposedDocument, Compositor, compose};
pub use config::Config;
pub use event::{EventBus, EventHandler, PlaygroundEvent};
pub use file::{Language, SourceFile};
pub use playground::{ActiveView, EditorOptions, EditorTheme, Playground};
pub use sink::{MemorySink, PREVIEW_SANDBOX, RenderSink};
pub use store::FileStore;
pub use workspace::{FileChange, Workspace};

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("A file named {0} already exists")]
    DuplicateName(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File name must not be empty")]
    EmptyName,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}
