use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use fc_core::ports::ReferenceMintPort;
use fc_core::{Capabilities, ContentRef};

/// Turns local paths into references another process can open.
///
/// 把本地路径转换为其他进程可以打开的引用。
pub struct MintReferenceUseCase {
    capabilities: Capabilities,
    minter: Arc<dyn ReferenceMintPort>,
}

impl MintReferenceUseCase {
    pub fn new(capabilities: Capabilities, minter: Arc<dyn ReferenceMintPort>) -> Self {
        Self {
            capabilities,
            minter,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Reference for an existing file. `None` when nothing exists at `path`.
    pub fn mint_existing(&self, path: &Path, authority: &str) -> Option<ContentRef> {
        if !path.exists() {
            debug!(path = %path.display(), "not minting a reference for a missing file");
            return None;
        }
        self.mint_for_output(path, authority)
    }

    /// Reference for a location an external step will write to. The file need
    /// not exist yet.
    pub fn mint_for_output(&self, path: &Path, authority: &str) -> Option<ContentRef> {
        if self.capabilities.provider_references {
            match self.minter.mint(path, authority) {
                Ok(reference) => return Some(reference),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        %authority,
                        error = %e,
                        "provider minting failed, falling back to a file reference"
                    );
                }
            }
        }
        file_reference(path)
    }
}

pub(crate) fn file_reference(path: &Path) -> Option<ContentRef> {
    ContentRef::from_file_path(path)
        .map_err(|e| warn!(path = %path.display(), error = %e, "cannot build file reference"))
        .ok()
}
