//! # Shrub Preview
//!
//! Rendering sinks for composed playground documents.
//!
//! The composed document itself is untrusted user code. Outside a browser
//! pane it is delivered either bare or wrapped in a host page that embeds it
//! through `<iframe sandbox="allow-scripts allow-modals" srcdoc="...">`, which
//! is the only capability set the preview ever gets.

mod host;
mod sinks;

pub use host::{HostPage, escape_attribute};
pub use sinks::{FileSink, PageFormat, WriterSink};

/// Result type for preview output
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors raised while writing a preview out.
///
/// Sinks log these instead of returning them from `RenderSink::load`.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("Failed to write preview to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
