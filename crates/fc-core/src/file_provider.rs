//! Host file provider roots.
//!
//! A provider-minted reference has the shape
//! `content://<authority>/<root name>/<path relative to the root>`.
//! Minting and locating are exact inverses for every path under a registered
//! root, which is what makes minting idempotent.

use std::path::{Component, Path, PathBuf};

use crate::ports::mint::MintError;
use crate::reference::ContentRef;
use crate::storage::StorageDirs;

pub const EXTERNAL_ROOT: &str = "external";
pub const EXTERNAL_FILES_ROOT: &str = "external_files";
pub const CACHE_ROOT: &str = "cache";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRoot {
    pub name: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileProviderRoots {
    roots: Vec<ProviderRoot>,
}

impl FileProviderRoots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.roots.push(ProviderRoot {
            name: name.into(),
            dir: dir.into(),
        });
        self
    }

    /// Roots a host app typically declares: external storage, its public pictures
    /// directory and its cache.
    pub fn from_storage_dirs(dirs: &StorageDirs) -> Self {
        let mut roots = Self::new().with_root(EXTERNAL_ROOT, dirs.external_root.clone());
        if let Some(pictures) = &dirs.pictures_dir {
            roots = roots.with_root(EXTERNAL_FILES_ROOT, pictures.clone());
        }
        roots.with_root(CACHE_ROOT, dirs.cache_dir.clone())
    }

    pub fn roots(&self) -> &[ProviderRoot] {
        &self.roots
    }

    /// Most specific root containing `path`.
    fn best_root<'a>(&'a self, path: &'a Path) -> Option<(&'a ProviderRoot, &'a Path)> {
        self.roots
            .iter()
            .filter_map(|root| path.strip_prefix(&root.dir).ok().map(|rel| (root, rel)))
            .max_by_key(|(root, _)| root.dir.components().count())
    }

    pub fn mint(&self, path: &Path, authority: &str) -> Result<ContentRef, MintError> {
        if authority.trim().is_empty() {
            return Err(MintError::InvalidAuthority(authority.to_string()));
        }
        let (root, relative) = self
            .best_root(path)
            .ok_or_else(|| MintError::OutsideRoots(path.to_path_buf()))?;

        let mut segments = vec![root.name.clone()];
        for component in relative.components() {
            match component {
                Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(MintError::OutsideRoots(path.to_path_buf())),
            }
        }
        Ok(ContentRef::content(authority, &segments)?)
    }

    /// Inverse of [`mint`](Self::mint). The caller checks the authority.
    pub fn locate(&self, reference: &ContentRef) -> Option<PathBuf> {
        let segments = reference.path_segments();
        let (first, rest) = segments.split_first()?;
        let root = self.roots.iter().find(|root| root.name == *first)?;
        if rest
            .iter()
            .any(|s| s == ".." || s == "." || s.contains('/') || s.contains('\\'))
        {
            return None;
        }
        Some(rest.iter().fold(root.dir.clone(), |acc, s| acc.join(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORITY: &str = "com.pichs.app.fileprovider";

    fn roots() -> FileProviderRoots {
        FileProviderRoots::new()
            .with_root(EXTERNAL_ROOT, "/storage/emulated/0")
            .with_root(
                EXTERNAL_FILES_ROOT,
                "/storage/emulated/0/Android/data/com.pichs.app/files/Pictures",
            )
    }

    #[test]
    fn mint_prefers_most_specific_root() {
        let path =
            Path::new("/storage/emulated/0/Android/data/com.pichs.app/files/Pictures/1_CROP_IMG.jpg");
        let r = roots().mint(path, AUTHORITY).unwrap();
        assert_eq!(
            r.as_str(),
            "content://com.pichs.app.fileprovider/external_files/1_CROP_IMG.jpg"
        );
    }

    #[test]
    fn mint_is_idempotent_and_locate_inverts_it() {
        let path = Path::new("/storage/emulated/0/DCIM/Camera/a b.jpg");
        let first = roots().mint(path, AUTHORITY).unwrap();
        let second = roots().mint(path, AUTHORITY).unwrap();
        assert_eq!(first, second);
        assert_eq!(roots().locate(&first).as_deref(), Some(path));
    }

    #[test]
    fn path_outside_roots_is_rejected() {
        let err = roots()
            .mint(Path::new("/data/user/0/com.pichs.app/files/a.jpg"), AUTHORITY)
            .unwrap_err();
        assert!(matches!(err, MintError::OutsideRoots(_)));
    }

    #[test]
    fn empty_authority_is_rejected() {
        let err = roots()
            .mint(Path::new("/storage/emulated/0/a.jpg"), " ")
            .unwrap_err();
        assert!(matches!(err, MintError::InvalidAuthority(_)));
    }

    #[test]
    fn locate_rejects_traversal() {
        let r = ContentRef::parse("content://com.pichs.app.fileprovider/external/..%2F..%2Fetc")
            .unwrap();
        assert_eq!(roots().locate(&r), None);
        let r = ContentRef::parse("content://com.pichs.app.fileprovider/unknown/a.jpg").unwrap();
        assert_eq!(roots().locate(&r), None);
    }
}
