use std::path::PathBuf;

use fc_core::ports::{StorageDirsError, StorageDirsPort};
use fc_core::StorageDirs;

const APP_DIR_NAME: &str = "filechooser";

fn resolved_app_dir_name() -> String {
    match std::env::var("FC_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Explicit locations that take precedence over the `dirs` defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageOverrides {
    pub external_root: Option<PathBuf>,
    pub volumes_root: Option<PathBuf>,
    pub pictures_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub private_data_dir: Option<PathBuf>,
}

/// Storage layout of a desktop host.
///
/// The home directory plays the external storage root, the user's picture
/// directory hosts the app's public pictures, and the per-user cache and
/// local data directories are the private ones.
pub struct DirsStorageAdapter {
    overrides: StorageOverrides,
}

impl DirsStorageAdapter {
    pub fn new() -> Self {
        Self {
            overrides: StorageOverrides::default(),
        }
    }

    pub fn with_overrides(overrides: StorageOverrides) -> Self {
        Self { overrides }
    }

    fn external_root(&self) -> Option<PathBuf> {
        self.overrides.external_root.clone().or_else(dirs::home_dir)
    }
}

impl Default for DirsStorageAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageDirsPort for DirsStorageAdapter {
    fn storage_dirs(&self) -> Result<StorageDirs, StorageDirsError> {
        let app_dir_name = resolved_app_dir_name();

        let external_root = self
            .external_root()
            .ok_or(StorageDirsError::ExternalRootUnavailable)?;
        let volumes_root = self.overrides.volumes_root.clone().unwrap_or_else(|| {
            external_root
                .parent()
                .map(PathBuf::from)
                .unwrap_or_else(|| external_root.clone())
        });
        let pictures_dir = self
            .overrides
            .pictures_dir
            .clone()
            .or_else(|| dirs::picture_dir().map(|dir| dir.join(&app_dir_name)));
        let cache_dir = match &self.overrides.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .ok_or(StorageDirsError::CacheDirUnavailable)?
                .join(&app_dir_name),
        };
        let private_data_dir = match &self.overrides.private_data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .ok_or(StorageDirsError::DataDirUnavailable)?
                .join(&app_dir_name),
        };

        Ok(StorageDirs {
            external_root,
            volumes_root,
            pictures_dir,
            cache_dir,
            private_data_dir,
        })
    }
}
