//! Sinks that write previews out of process.

use std::io::Write;
use std::path::{Path, PathBuf};

use shrub_core::RenderSink;

use crate::host::HostPage;
use crate::{PreviewError, PreviewResult};

/// How a composed document is laid out on output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageFormat {
    /// The composed document as is
    #[default]
    Bare,
    /// Wrapped in a sandboxed host page
    Hosted(HostPage),
}

impl PageFormat {
    /// Produces the output text for `document`.
    pub fn render(&self, document: &str) -> String {
        match self {
            PageFormat::Bare => document.to_string(),
            PageFormat::Hosted(host) => host.render(document),
        }
    }
}

/// Writes each loaded document to a file, replacing its contents.
///
/// Output goes to a sibling temporary file first and is then renamed over
/// the target, so a browser reloading the file never sees half a document.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    format: PageFormat,
    writes: usize,
    failures: usize,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: PageFormat) -> Self {
        Self {
            path: path.into(),
            format,
            writes: 0,
            failures: 0,
        }
    }

    /// Returns the output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Returns the number of failed writes.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Writes `document` to the output path.
    pub fn write(&self, document: &str) -> PreviewResult<()> {
        let wrap = |source| PreviewError::Write {
            path: self.path.display().to_string(),
            source,
        };

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, self.format.render(document)).map_err(wrap)?;
        std::fs::rename(&tmp, &self.path).map_err(wrap)?;
        Ok(())
    }
}

impl RenderSink for FileSink {
    fn load(&mut self, document: &str) {
        match self.write(document) {
            Ok(()) => {
                self.writes += 1;
                tracing::debug!("Preview written to {}", self.path.display());
            }
            Err(e) => {
                self.failures += 1;
                tracing::warn!("{}", e);
            }
        }
    }
}

/// Writes each loaded document to a stream, such as stdout.
pub struct WriterSink<W> {
    writer: W,
    format: PageFormat,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, format: PageFormat) -> Self {
        Self { writer, format }
    }

    /// Consumes the sink, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write(&mut self, document: &str) -> PreviewResult<()> {
        let page = self.format.render(document);
        self.writer.write_all(page.as_bytes())?;
        if !page.ends_with('\n') {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> RenderSink for WriterSink<W> {
    fn load(&mut self, document: &str) {
        if let Err(e) = self.write(document) {
            tracing::warn!("Failed to write preview: {}", e);
        }
    }
}
