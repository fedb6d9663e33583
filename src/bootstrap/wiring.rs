//! # Dependency Injection / 依赖注入模块
//!
//! Assembles the desktop adapters from `fc-platform` into the use cases of
//! `fc-app`. Policy lives here: empty config paths fall back to the `dirs`
//! layout, an empty authority falls back to `<package id>.fileprovider`.
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//!
//! > This is the only place allowed to depend on fc-platform + fc-app simultaneously.
//! > 这是唯一允许同时依赖 fc-platform 和 fc-app 的地方。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fc_app::{
    AcquisitionCoordinator, AcquisitionServices, MintReferenceUseCase, ReferenceResolver,
    ResolverContext, ShareDispatcher,
};
use fc_core::authority::default_file_provider_authority;
use fc_core::ports::{DelegationPort, SharePort, StorageDirsError, StorageDirsPort};
use fc_core::{Capabilities, ChooserConfig, FileProviderRoots, SessionDefaults, StorageDirs};
use fc_platform::{
    detect_capabilities, DirsStorageAdapter, ImageCrateCodec, InMemoryContentIndex,
    LocalContentStreams, LocalFileProvider, StorageOverrides, SystemClock,
};

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Storage layout unavailable: {0}")]
    Storage(#[from] StorageDirsError),

    #[error("Neither a package id nor a file-provider authority is configured")]
    MissingAuthority,
}

/// Shared collaborators every chooser component is built from.
/// 选择器各组件共享的依赖
pub struct ChooserDeps {
    pub capabilities: Capabilities,
    pub storage: StorageDirs,
    pub authority: String,
    pub roots: FileProviderRoots,
    /// Backing content index. Hosts populate it with their media rows.
    pub index: Arc<InMemoryContentIndex>,
    pub resolver: Arc<ReferenceResolver>,
    pub minter: Arc<MintReferenceUseCase>,
    session_defaults: SessionDefaults,
}

fn non_empty(path: &Path) -> Option<PathBuf> {
    (!path.as_os_str().is_empty()).then(|| path.to_path_buf())
}

fn storage_overrides(config: &ChooserConfig) -> StorageOverrides {
    StorageOverrides {
        external_root: non_empty(&config.storage_root),
        volumes_root: non_empty(&config.volumes_root),
        pictures_dir: non_empty(&config.pictures_dir),
        cache_dir: non_empty(&config.cache_dir),
        private_data_dir: non_empty(&config.private_data_dir),
    }
}

fn resolve_authority(config: &ChooserConfig) -> WiringResult<String> {
    if !config.authority.trim().is_empty() {
        return Ok(config.authority.trim().to_string());
    }
    if config.package_id.trim().is_empty() {
        return Err(WiringError::MissingAuthority);
    }
    Ok(default_file_provider_authority(config.package_id.trim()))
}

/// Wire the desktop adapters for `config`.
/// 根据配置装配桌面适配器
///
/// # Errors / 错误
///
/// Fails when the storage layout cannot be determined or no authority can be
/// derived.
pub fn wire_dependencies(config: &ChooserConfig) -> WiringResult<ChooserDeps> {
    let authority = resolve_authority(config)?;
    let capabilities = detect_capabilities(config.api_level);
    let storage = DirsStorageAdapter::with_overrides(storage_overrides(config)).storage_dirs()?;
    let roots = FileProviderRoots::from_storage_dirs(&storage);

    let index = Arc::new(InMemoryContentIndex::new());
    let streams =
        LocalContentStreams::new(index.clone()).with_provider(authority.clone(), roots.clone());
    let mut resolver = ReferenceResolver::with_default_strategies(ResolverContext {
        capabilities,
        storage: storage.clone(),
        query: index.clone(),
        streams: Arc::new(streams),
    });
    resolver.register_file_provider(authority.clone(), roots.clone());

    let minter = MintReferenceUseCase::new(
        capabilities,
        Arc::new(LocalFileProvider::new(roots.clone())),
    );

    let mut session_defaults = config.session_defaults();
    session_defaults.authority = Some(authority.clone());

    tracing::info!(
        %authority,
        external_root = %storage.external_root.display(),
        document_references = capabilities.document_references,
        provider_references = capabilities.provider_references,
        "chooser dependencies wired"
    );

    Ok(ChooserDeps {
        capabilities,
        storage,
        authority,
        roots,
        index,
        resolver: Arc::new(resolver),
        minter: Arc::new(minter),
        session_defaults,
    })
}

impl ChooserDeps {
    /// Coordinator delegating external steps to `delegation`.
    pub fn acquisition_coordinator(
        &self,
        delegation: Arc<dyn DelegationPort>,
    ) -> AcquisitionCoordinator {
        AcquisitionCoordinator::new(AcquisitionServices {
            resolver: self.resolver.clone(),
            minter: self.minter.clone(),
            delegation,
            codec: Arc::new(ImageCrateCodec),
            clock: Arc::new(SystemClock),
        })
        .with_session_defaults(self.session_defaults.clone())
    }

    pub fn share_dispatcher(&self, port: Arc<dyn SharePort>) -> ShareDispatcher {
        ShareDispatcher::new(port)
    }

    pub fn session_defaults(&self) -> &SessionDefaults {
        &self.session_defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_core::acquisition::DelegationRequest;
    use fc_core::ports::DelegationError;
    use fc_core::{ContentRef, Owner, ResolvedLocation};
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingDelegation {
        codes: Mutex<Vec<i32>>,
    }

    impl DelegationPort for RecordingDelegation {
        fn delegate(
            &self,
            _owner: &Owner,
            _request: DelegationRequest,
            code: i32,
        ) -> Result<(), DelegationError> {
            self.codes.lock().unwrap().push(code);
            Ok(())
        }
    }

    fn config_in(root: &TempDir) -> ChooserConfig {
        let mut config = ChooserConfig::empty();
        config.package_id = "com.pichs.app".to_string();
        config.api_level = Some(30);
        config.storage_root = root.path().join("sdcard");
        config.pictures_dir = root.path().join("sdcard/Pictures/app");
        config.cache_dir = root.path().join("cache");
        config.private_data_dir = root.path().join("data");
        config
    }

    #[test]
    fn test_authority_falls_back_to_package_id() {
        let root = TempDir::new().unwrap();
        let deps = wire_dependencies(&config_in(&root)).unwrap();
        assert_eq!(deps.authority, "com.pichs.app.fileprovider");
        assert_eq!(
            deps.session_defaults().authority.as_deref(),
            Some("com.pichs.app.fileprovider")
        );
    }

    #[test]
    fn test_missing_package_and_authority_is_an_error() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(&root);
        config.package_id.clear();
        assert!(matches!(
            wire_dependencies(&config),
            Err(WiringError::MissingAuthority)
        ));
    }

    #[test]
    fn test_config_paths_override_storage_layout() {
        let root = TempDir::new().unwrap();
        let deps = wire_dependencies(&config_in(&root)).unwrap();
        assert_eq!(deps.storage.external_root, root.path().join("sdcard"));
        assert_eq!(deps.storage.volumes_root, root.path());
        assert_eq!(
            deps.storage.pictures_dir,
            Some(root.path().join("sdcard/Pictures/app"))
        );
    }

    #[test]
    fn test_minted_reference_resolves_through_wired_resolver() {
        let root = TempDir::new().unwrap();
        let deps = wire_dependencies(&config_in(&root)).unwrap();
        let file = root.path().join("sdcard/DCIM/a.jpg");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"jpeg").unwrap();

        let reference: ContentRef = deps.minter.mint_existing(&file, &deps.authority).unwrap();

        assert_eq!(reference.authority(), Some("com.pichs.app.fileprovider"));
        assert_eq!(
            deps.resolver.resolve(&reference, None),
            Some(ResolvedLocation::Path(file))
        );
    }

    #[test]
    fn test_coordinator_uses_configured_codes() {
        let root = TempDir::new().unwrap();
        let mut config = config_in(&root);
        config.gallery_code = Some(41);
        let deps = wire_dependencies(&config).unwrap();
        let delegation = Arc::new(RecordingDelegation::default());

        let mut coordinator = deps.acquisition_coordinator(delegation.clone());
        coordinator
            .with(&Owner::activity("main", "com.pichs.app"))
            .gallery()
            .open();

        assert_eq!(*delegation.codes.lock().unwrap(), vec![41]);
    }
}
