//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::storage::{Document, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores pages in memory, keyed by URL path.
///
/// # Example
///
/// ```
/// use dewy_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_page("faq", "# FAQ\n\nContent.")
///     .with_mtime("faq", 42.0);
///
/// assert_eq!(storage.read("faq").unwrap(), "# FAQ\n\nContent.");
/// assert_eq!(storage.mtime("faq").unwrap(), 42.0);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    pages: RwLock<BTreeMap<String, String>>,
    mtimes: RwLock<BTreeMap<String, f64>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with the given URL path and markdown content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Set modification time for a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_mtime(self, path: impl Into<String>, mtime: f64) -> Self {
        self.mtimes.write().unwrap().insert(path.into(), mtime);
        self
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        let pages = self.pages.read().unwrap();
        Ok(pages
            .keys()
            .map(|path| Document { path: path.clone() })
            .collect())
    }

    fn read(&self, path: &str) -> Result<String, StorageError> {
        self.pages
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }

    fn exists(&self, path: &str) -> bool {
        self.pages.read().unwrap().contains_key(path)
    }

    fn mtime(&self, path: &str) -> Result<f64, StorageError> {
        if !self.exists(path) {
            return Err(StorageError::not_found(path).with_backend(BACKEND));
        }
        Ok(self
            .mtimes
            .read()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_scan_sorted_by_path() {
        let storage = MockStorage::new()
            .with_page("ja/faq", "# よくある質問")
            .with_page("", "# Home")
            .with_page("faq", "no title");

        let docs = storage.scan().unwrap();
        let paths: Vec<_> = docs.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["", "faq", "ja/faq"]);
    }

    #[test]
    fn test_read_missing() {
        let storage = MockStorage::new();
        let err = storage.read("missing").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_mtime_defaults_to_zero() {
        let storage = MockStorage::new().with_page("faq", "# FAQ");
        assert!(storage.mtime("faq").unwrap().abs() < f64::EPSILON);
        assert!(storage.mtime("missing").is_err());
    }
}
