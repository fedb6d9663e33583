use crate::owner::Owner;
use crate::share::{ShareError, ShareRequest};

/// Hands a validated share request to the host's outbound share mechanism.
pub trait SharePort: Send + Sync {
    fn dispatch(&self, owner: &Owner, request: &ShareRequest) -> Result<(), ShareError>;
}
