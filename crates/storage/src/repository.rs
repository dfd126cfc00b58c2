use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scorm_core::Clock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::fs::FsPackageStore;

/// Errors surfaced by archive assembly and package stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("duplicate archive entry: {0}")]
    DuplicateEntry(String),

    #[error("invalid package file name: {0:?}")]
    InvalidName(String),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("store unavailable: {0}")]
    Connection(String),
}

/// Receipt for a package written to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPackage {
    pub file_name: String,
    /// Where the package ended up: a path for the filesystem store, a
    /// `memory://` URI for the in-memory one.
    pub location: String,
    pub size: u64,
    pub stored_at: DateTime<Utc>,
}

/// Destination for generated package archives.
#[async_trait]
pub trait PackageStore: Send + Sync {
    /// Store (or replace) a package under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidName` for names that are not a single
    /// path segment, or other storage errors if the write fails.
    async fn put_package(&self, file_name: &str, bytes: &[u8])
    -> Result<StoredPackage, StorageError>;

    /// Fetch a stored package.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_package(&self, file_name: &str) -> Result<Vec<u8>, StorageError>;

    /// Names of stored packages, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be listed.
    async fn list_packages(&self) -> Result<Vec<String>, StorageError>;
}

/// Package names must be a single, non-hidden file name.
///
/// # Errors
///
/// Returns `StorageError::InvalidName` otherwise.
pub fn validate_file_name(file_name: &str) -> Result<(), StorageError> {
    let invalid = file_name.trim().is_empty()
        || file_name.starts_with('.')
        || file_name.contains(['/', '\\', '\0'])
        || Path::new(file_name).file_name().and_then(|n| n.to_str()) != Some(file_name);
    if invalid {
        return Err(StorageError::InvalidName(file_name.to_owned()));
    }
    Ok(())
}

/// Simple in-memory package store for testing and dry runs.
#[derive(Clone, Default)]
pub struct InMemoryPackageStore {
    clock: Clock,
    packages: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryPackageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl PackageStore for InMemoryPackageStore {
    async fn put_package(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredPackage, StorageError> {
        validate_file_name(file_name)?;
        let mut guard = self
            .packages
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(file_name.to_owned(), bytes.to_vec());
        Ok(StoredPackage {
            file_name: file_name.to_owned(),
            location: format!("memory://{file_name}"),
            size: bytes.len() as u64,
            stored_at: self.clock.now(),
        })
    }

    async fn get_package(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        let guard = self
            .packages
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(file_name).cloned().ok_or(StorageError::NotFound)
    }

    async fn list_packages(&self) -> Result<Vec<String>, StorageError> {
        let guard = self
            .packages
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.keys().cloned().collect())
    }
}

/// Package store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub packages: Arc<dyn PackageStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        let packages: Arc<dyn PackageStore> =
            Arc::new(InMemoryPackageStore::new().with_clock(clock));
        Self { packages }
    }

    #[must_use]
    pub fn filesystem(root: impl AsRef<Path>, clock: Clock) -> Self {
        let packages: Arc<dyn PackageStore> = Arc::new(FsPackageStore::new(root, clock));
        Self { packages }
    }
}
