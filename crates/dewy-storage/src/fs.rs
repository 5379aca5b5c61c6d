//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for reading pages from a local source directory.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::storage::{Document, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Maps URL paths to markdown files:
/// - `""` → `index.md`
/// - `"faq"` → `faq.md`, falling back to `faq/index.md`
/// - `"ja/faq"` → `ja/faq.md`, falling back to `ja/faq/index.md`
pub struct FsStorage {
    /// Root directory for page sources.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Root directory for page sources.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Validate that a URL path doesn't escape the source directory.
    ///
    /// Rejects paths containing parent directory components (`..`).
    fn validate_path(path: &str) -> Result<(), StorageError> {
        let has_parent_dir = Path::new(path)
            .components()
            .any(|c| matches!(c, Component::ParentDir));

        if has_parent_dir {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Resolve a URL path to an existing markdown file.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        Self::validate_path(path)?;

        let path = path.trim_matches('/');
        let candidates = if path.is_empty() {
            vec![self.source_dir.join("index.md")]
        } else {
            vec![
                self.source_dir.join(format!("{path}.md")),
                self.source_dir.join(path).join("index.md"),
            ]
        };

        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    /// Walk a directory and collect documents.
    fn scan_directory(dir: &Path, url_prefix: &str, docs: &mut Vec<Document>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
                return;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            // Skip hidden files/dirs
            if name.starts_with('.') {
                continue;
            }

            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            if is_dir {
                Self::scan_directory(&path, &join_url(url_prefix, &name), docs);
            } else if let Some(stem) = name.strip_suffix(".md") {
                let url_path = if stem == "index" {
                    url_prefix.to_owned()
                } else {
                    join_url(url_prefix, stem)
                };
                docs.push(Document { path: url_path });
            }
        }
    }
}

/// Join a URL prefix and a segment with `/`.
fn join_url(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}/{segment}")
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        if !self.source_dir.is_dir() {
            return Err(StorageError::not_found(&self.source_dir).with_backend(BACKEND));
        }

        let mut docs = Vec::new();
        Self::scan_directory(&self.source_dir, "", &mut docs);
        docs.sort_by(|a, b| a.path.cmp(&b.path));
        // `faq.md` and `faq/index.md` map to the same URL; the first one wins.
        docs.dedup_by(|a, b| a.path == b.path);

        tracing::debug!(count = docs.len(), dir = %self.source_dir.display(), "Scanned pages");
        Ok(docs)
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        let file = self.resolve(path)?;
        fs::read_to_string(&file).map_err(|e| StorageError::io(e, Some(file)).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        let file = self.resolve(path)?;
        let modified = fs::metadata(&file)
            .and_then(|m| m.modified())
            .map_err(|e| StorageError::io(e, Some(file.clone())).with_backend(BACKEND))?;

        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default())
    }
}
