use thiserror::Error;

use crate::storage::StorageDirs;

#[derive(Debug, Error)]
pub enum StorageDirsError {
    #[error("external storage root unavailable")]
    ExternalRootUnavailable,

    #[error("cache directory unavailable")]
    CacheDirUnavailable,

    #[error("private data directory unavailable")]
    DataDirUnavailable,
}

pub trait StorageDirsPort: Send + Sync {
    fn storage_dirs(&self) -> Result<StorageDirs, StorageDirsError>;
}
