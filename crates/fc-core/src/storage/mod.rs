use std::path::{Path, PathBuf};

/// Directory layout the resolver and the coordinator work against.
///
/// Pure fact container: the platform layer fills it in, nothing here touches the
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageDirs {
    /// Public external storage root (`/storage/emulated/0` on a device).
    pub external_root: PathBuf,
    /// Parent of named removable volumes (`/storage`).
    pub volumes_root: PathBuf,
    /// App-specific public pictures directory, if the platform exposes one.
    pub pictures_dir: Option<PathBuf>,
    /// Private cache; used only for the download byte-copy fallback.
    pub cache_dir: PathBuf,
    /// Private app data; never handed to an external step.
    pub private_data_dir: PathBuf,
}

const PUBLIC_PICTURES_DIR_NAME: &str = "Pictures";
const DOCUMENTS_CACHE_DIR_NAME: &str = "documents";

impl StorageDirs {
    /// Pictures directory, falling back to `<external root>/Pictures`.
    pub fn public_pictures_dir(&self) -> PathBuf {
        self.pictures_dir
            .clone()
            .unwrap_or_else(|| self.external_root.join(PUBLIC_PICTURES_DIR_NAME))
    }

    pub fn documents_cache_dir(&self) -> PathBuf {
        self.cache_dir.join(DOCUMENTS_CACHE_DIR_NAME)
    }

    /// External steps cannot write into private app storage.
    pub fn is_private(&self, path: &Path) -> bool {
        path.starts_with(&self.private_data_dir) || path.starts_with(&self.cache_dir)
    }
}
