//! ZIP assembly for SCORM packages.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};

use chrono::{DateTime, Datelike, Timelike, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::repository::StorageError;

/// Ordered set of files that becomes one package archive.
#[derive(Debug, Clone, Default)]
pub struct PackageArchive {
    files: Vec<(String, Vec<u8>)>,
    modified: Option<DateTime<Utc>>,
}

impl PackageArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every entry with `at` instead of the zip crate's default time.
    #[must_use]
    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.modified = Some(at);
        self
    }

    #[must_use]
    pub fn add_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.push((name.into(), contents.into()));
        self
    }

    #[must_use]
    pub fn entry_names(&self) -> Vec<&str> {
        self.files.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Build the DEFLATE-compressed archive and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateEntry` if two files share a name, or
    /// `StorageError::Archive` if the zip writer fails.
    pub fn build(self) -> Result<Vec<u8>, StorageError> {
        let mut seen = HashSet::new();
        for (name, _) in &self.files {
            if !seen.insert(name.as_str()) {
                return Err(StorageError::DuplicateEntry(name.clone()));
            }
        }

        let mut options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        if let Some(stamp) = self.modified.and_then(zip_timestamp) {
            options = options.last_modified_time(stamp);
        }

        let mut buf = Vec::new();
        {
            let mut writer = ZipWriter::new(Cursor::new(&mut buf));
            for (name, contents) in &self.files {
                writer.start_file(name.as_str(), options)?;
                writer.write_all(contents)?;
            }
            writer.finish()?;
        }
        Ok(buf)
    }
}

/// Zip timestamps cover 1980..=2107; anything else falls back to the default.
fn zip_timestamp(at: DateTime<Utc>) -> Option<zip::DateTime> {
    let year = u16::try_from(at.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        u8::try_from(at.month()).ok()?,
        u8::try_from(at.day()).ok()?,
        u8::try_from(at.hour()).ok()?,
        u8::try_from(at.minute()).ok()?,
        u8::try_from(at.second()).ok()?,
    )
    .ok()
}

/// Names of the entries in an archive, in stored order.
///
/// # Errors
///
/// Returns `StorageError::Archive` if `bytes` is not a readable zip.
pub fn list_entries(bytes: &[u8]) -> Result<Vec<String>, StorageError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    (0..archive.len())
        .map(|i| Ok(archive.by_index(i)?.name().to_owned()))
        .collect()
}

/// Read one entry of an archive as UTF-8 text.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the entry is missing, or
/// `StorageError::Archive`/`StorageError::Io` if it cannot be read.
pub fn read_entry(bytes: &[u8], name: &str) -> Result<String, StorageError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut file = match archive.by_name(name) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => return Err(StorageError::NotFound),
        Err(err) => return Err(err.into()),
    };
    let mut text = String::new();
    file.read_to_string(&mut text)?;
    Ok(text)
}
