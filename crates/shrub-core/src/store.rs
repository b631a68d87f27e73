//! The file store: an ordered set of uniquely named source files plus the
//! active-file session.
//!
//! ## Ordering
//!
//! Files are kept in a `Vec` in insertion order. The compositor relies on this
//! order to pick the first file of each kind, and the session relies on it to
//! fall back after the active file is deleted.
//!
//! ## Learning: Keys Instead of References
//!
//! The session stores the active file's *name*, not a `&SourceFile`.
//! Holding a reference into `files` would borrow the store for as long as
//! the session lives, and no mutation could happen. A key is looked up on
//! demand:
//! - Deleting a file can never leave a dangling active entry
//! - `active()` hands out a short borrow only when asked
//! - The store stays `Clone` and trivially `Send`

use crate::file::{Language, SourceFile};
use crate::{CoreError, CoreResult};

/// Owns the source files and tracks which one is being edited.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    /// Files in insertion order
    files: Vec<SourceFile>,

    /// Name of the file being edited
    active: Option<String>,
}

impl FileStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from initial files; the first one becomes active.
    ///
    /// Later files whose name repeats an earlier one are dropped.
    pub fn with_files(files: impl IntoIterator<Item = SourceFile>) -> Self {
        let mut store = Self::new();
        for file in files {
            if store.contains(file.name()) {
                tracing::warn!("Skipping duplicate initial file {}", file.name());
                continue;
            }
            store.files.push(file);
        }
        store.active = store.files.first().map(|f| f.name().to_string());
        store
    }

    /// Returns files in insertion order.
    pub fn list_files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Returns true if a file with this exact name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns a file by name.
    pub fn get(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name() == name)
    }

    /// Adds a file and makes it active.
    ///
    /// A bare `name` is qualified with the language suffix first. The store is
    /// left untouched when the qualified name is already taken.
    pub fn add_file(
        &mut self,
        name: &str,
        language: Language,
        content: impl Into<String>,
    ) -> CoreResult<&SourceFile> {
        if name.is_empty() {
            return Err(CoreError::EmptyName);
        }

        let name = language.qualify(name);
        if self.contains(&name) {
            return Err(CoreError::DuplicateName(name));
        }

        tracing::debug!("Adding {} ({})", name, language);
        self.files.push(SourceFile::new(name.clone(), language, content));
        self.active = Some(name);

        let idx = self.files.len() - 1;
        Ok(&self.files[idx])
    }

    /// Makes the named file active.
    pub fn select_file(&mut self, name: &str) -> CoreResult<&SourceFile> {
        let idx = self
            .position(name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;
        self.active = Some(name.to_string());
        Ok(&self.files[idx])
    }

    /// Replaces the content of the active file.
    ///
    /// Returns `None` without touching anything when no file is active.
    pub fn update_active_content(&mut self, content: impl Into<String>) -> Option<&SourceFile> {
        let idx = self.active_index()?;
        let file = &mut self.files[idx];
        file.set_content(content);
        Some(file)
    }

    /// Replaces the content of a file by name, leaving the session alone.
    pub fn update_content(&mut self, name: &str, content: impl Into<String>) -> CoreResult<&SourceFile> {
        let idx = self
            .position(name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;
        let file = &mut self.files[idx];
        file.set_content(content);
        Ok(file)
    }

    /// Removes the named file.
    ///
    /// If it was active, the first remaining file becomes active, or none if
    /// the store is now empty.
    pub fn delete_file(&mut self, name: &str) -> CoreResult<SourceFile> {
        let idx = self
            .position(name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;

        let removed = self.files.remove(idx);
        tracing::debug!("Deleted {}", removed.name());

        if self.active.as_deref() == Some(name) {
            self.active = self.files.first().map(|f| f.name().to_string());
        }

        Ok(removed)
    }

    /// Returns the active file.
    pub fn active(&self) -> Option<&SourceFile> {
        self.active_index().map(|idx| &self.files[idx])
    }

    /// Returns the active file name.
    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Returns the first file of a language in insertion order.
    pub fn first_of(&self, language: Language) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.language() == language)
    }

    /// Returns the number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name() == name)
    }

    fn active_index(&self) -> Option<usize> {
        self.active.as_deref().and_then(|name| self.position(name))
    }
}
