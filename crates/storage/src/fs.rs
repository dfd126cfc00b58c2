use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use scorm_core::Clock;
use tracing::debug;

use crate::repository::{PackageStore, StorageError, StoredPackage, validate_file_name};

/// Writes packages as files into one output directory.
#[derive(Debug, Clone)]
pub struct FsPackageStore {
    root: PathBuf,
    clock: Clock,
}

impl FsPackageStore {
    #[must_use]
    pub fn new(root: impl AsRef<Path>, clock: Clock) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            clock,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl PackageStore for FsPackageStore {
    async fn put_package(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<StoredPackage, StorageError> {
        validate_file_name(file_name)?;
        tokio::fs::create_dir_all(&self.root).await?;

        // Write next to the target and rename, so a reader never sees half a zip.
        let target = self.root.join(file_name);
        let partial = self.root.join(format!(".{file_name}.partial"));
        tokio::fs::write(&partial, bytes).await?;
        if let Err(err) = tokio::fs::rename(&partial, &target).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(err.into());
        }
        debug!(path = %target.display(), size = bytes.len(), "package written");

        Ok(StoredPackage {
            file_name: file_name.to_owned(),
            location: target.display().to_string(),
            size: bytes.len() as u64,
            stored_at: self.clock.now(),
        })
    }

    async fn get_package(&self, file_name: &str) -> Result<Vec<u8>, StorageError> {
        validate_file_name(file_name)?;
        match tokio::fs::read(self.root.join(file_name)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    async fn list_packages(&self) -> Result<Vec<String>, StorageError> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if name.ends_with(".zip") && !name.starts_with('.') && entry.file_type().await?.is_file()
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
