//! Storage abstraction for Dewy documentation pages.
//!
//! This crate provides a [`Storage`] trait for reading markdown pages by URL
//! path, decoupling the site from the filesystem. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Static export** by enumerating every page with [`Storage::scan`]
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `read()`, `exists()` and `mtime()` methods
//! - [`FsStorage`] implementation for a local `pages/` directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use dewy_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("pages"));
//! let markdown = storage.read("ja/introduction")?;
//! # Ok::<(), dewy_storage::StorageError>(())
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Document, Storage, StorageError, StorageErrorKind};
