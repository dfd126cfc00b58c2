#![forbid(unsafe_code)]

pub mod archive;
pub mod fs;
pub mod repository;

pub use archive::{PackageArchive, list_entries, read_entry};
pub use fs::FsPackageStore;
pub use repository::{InMemoryPackageStore, PackageStore, Storage, StorageError, StoredPackage};
