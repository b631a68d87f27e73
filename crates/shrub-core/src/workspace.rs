//! Directory-backed playgrounds.
//!
//! A workspace maps the top-level `*.html`, `*.css` and `*.js` files of one
//! directory onto a file store, and can watch that directory so edits made
//! in an external editor flow into the playground.

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::defaults::default_files;
use crate::file::{Language, SourceFile};
use crate::playground::Playground;
use crate::sink::RenderSink;
use crate::store::FileStore;
use crate::{CoreError, CoreResult};

/// A playground backed by a directory.
pub struct Workspace {
    /// Root directory of the workspace
    root: PathBuf,

    /// Workspace name
    name: String,

    /// Keeps the watcher alive while changes are wanted
    watcher: Option<RecommendedWatcher>,

    /// Paths in the root that are never treated as playground files
    ignored: Vec<PathBuf>,
}

impl Workspace {
    /// Opens a workspace from a directory.
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let root = path.as_ref().canonicalize()?;

        if !root.is_dir() {
            return Err(CoreError::NotFound(root.display().to_string()));
        }

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Workspace")
            .to_string();

        Ok(Self {
            root,
            name,
            watcher: None,
            ignored: Vec::new(),
        })
    }

    /// Writes the starter files into `dir`, creating it if needed.
    ///
    /// Refuses to overwrite: an existing starter file fails with an
    /// `AlreadyExists` IO error before anything is written.
    pub fn init(dir: impl AsRef<Path>) -> CoreResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let files = default_files();
        for file in &files {
            let path = dir.join(file.name());
            if path.exists() {
                return Err(CoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("{} already exists", path.display()),
                )));
            }
        }

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let path = dir.join(file.name());
            let mut out = OpenOptions::new().write(true).create_new(true).open(&path)?;
            out.write_all(file.content().as_bytes())?;
            tracing::debug!("Wrote {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Returns the workspace root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the workspace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Excludes a path from loading and from watched changes.
    ///
    /// The path does not have to exist yet, but its parent directory does.
    /// Used to keep a preview written into the workspace out of the store.
    pub fn ignore(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let Some(file_name) = path.file_name() else {
            return Err(CoreError::NotFound(path.display().to_string()));
        };
        let resolved = parent.canonicalize()?.join(file_name);
        tracing::debug!("Ignoring {}", resolved.display());
        self.ignored.push(resolved);
        Ok(())
    }

    /// Reads the playground files of the directory.
    ///
    /// `index.html` comes first so it becomes the composition root, the rest
    /// follow in name order. Names that do not end in exactly `.html`, `.css`
    /// or `.js` are skipped, and so are files that are not valid UTF-8.
    pub fn load_files(&self) -> CoreResult<Vec<SourceFile>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if let Some((name, language)) = self.playground_name(&path) {
                entries.push((name, language, path));
            }
        }

        entries.sort_by(|(a, ..), (b, ..)| {
            (a != "index.html", a.as_str()).cmp(&(b != "index.html", b.as_str()))
        });

        let mut files = Vec::with_capacity(entries.len());
        for (name, language, path) in entries {
            match std::fs::read_to_string(&path) {
                Ok(content) => files.push(SourceFile::new(name, language, content)),
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    tracing::warn!("Skipping {}: not valid UTF-8", path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(files)
    }

    /// Builds a file store from the directory contents.
    pub fn load_store(&self) -> CoreResult<FileStore> {
        let files = self.load_files()?;
        tracing::info!("Loaded {} files from {}", files.len(), self.name);
        Ok(FileStore::with_files(files))
    }

    /// Starts watching the directory for changes.
    pub fn start_watching(&mut self) -> CoreResult<mpsc::Receiver<FileChange>> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    for path in event.paths {
                        let change = match event.kind {
                            notify::EventKind::Create(_) => FileChange::Created(path),
                            notify::EventKind::Modify(_) => FileChange::Modified(path),
                            notify::EventKind::Remove(_) => FileChange::Deleted(path),
                            _ => continue,
                        };
                        let _ = tx.blocking_send(change);
                    }
                }
                Err(e) => tracing::warn!("Watch error: {}", e),
            }
        })?;

        watcher.watch(&self.root, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);
        tracing::info!("Watching {}", self.root.display());

        Ok(rx)
    }

    /// Returns true while a watcher is running.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Stops the watcher; the receiver sees the channel close.
    pub fn stop_watching(&mut self) {
        self.watcher = None;
    }

    /// Applies an on-disk change to the playground.
    ///
    /// Only playground files directly in the root are applied, minus any
    /// ignored paths. A created or modified path that no longer exists is treated
    /// as deleted, which covers renames. Returns true if the playground was touched.
    pub fn apply_change<S: RenderSink>(
        &self,
        playground: &mut Playground<S>,
        change: &FileChange,
    ) -> CoreResult<bool> {
        let path = change.path();
        let Some((name, language)) = self.playground_name(path) else {
            return Ok(false);
        };
        let exists = playground.store().contains(&name);

        let removed = matches!(change, FileChange::Deleted(_)) || !path.is_file();
        if removed {
            if exists {
                playground.delete_file(&name)?;
                return Ok(true);
            }
            return Ok(false);
        }

        let content = std::fs::read_to_string(path)?;
        if exists {
            if playground.store().get(&name).map(SourceFile::content) == Some(content.as_str()) {
                return Ok(false);
            }
            playground.update_file(&name, &content)?;
        } else {
            playground.add_file(&name, language, &content)?;
        }
        Ok(true)
    }

    /// Maps a path to its store name if it is a playground file in the root.
    fn playground_name(&self, path: &Path) -> Option<(String, Language)> {
        if path.parent() != Some(self.root.as_path()) || self.ignored.iter().any(|p| p == path) {
            return None;
        }
        let name = path.file_name()?.to_str()?;
        let language = Language::from_path(path)?;
        (language.qualify(name) == name).then(|| (name.to_string(), language))
    }
}

/// File change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Deleted(PathBuf),
}

impl FileChange {
    /// Returns the path that changed.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Created(p) | FileChange::Modified(p) | FileChange::Deleted(p) => p,
        }
    }
}
