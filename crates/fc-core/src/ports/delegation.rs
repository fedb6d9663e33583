use thiserror::Error;

use crate::acquisition::DelegationRequest;
use crate::owner::Owner;

#[derive(Debug, Error)]
pub enum DelegationError {
    #[error("no external handler for {0}")]
    NoHandler(String),

    #[error("delegation failed: {0}")]
    Failed(String),
}

/// Opens an external surface (gallery, camera, document picker, crop).
///
/// Completion arrives later through the coordinator's `on_completion`, tagged
/// with the same correlation `code`.
pub trait DelegationPort: Send + Sync {
    fn delegate(
        &self,
        owner: &Owner,
        request: DelegationRequest,
        code: i32,
    ) -> Result<(), DelegationError>;
}
