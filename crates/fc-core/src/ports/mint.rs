use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::reference::{ContentRef, ReferenceError};

#[derive(Debug, Error)]
pub enum MintError {
    #[error("path is outside every provider root: {0}")]
    OutsideRoots(PathBuf),

    #[error("invalid provider authority: `{0}`")]
    InvalidAuthority(String),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Provider-mediated reference creation.
///
/// Must be idempotent: minting the same path under the same authority twice
/// yields equal references.
pub trait ReferenceMintPort: Send + Sync {
    fn mint(&self, path: &Path, authority: &str) -> Result<ContentRef, MintError>;
}
