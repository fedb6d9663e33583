//! ID type wrappers for type safety.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Stable identifier of a requesting owner (a window, screen or fragment).
///
/// The host chooses it; the coordinator only uses it as a registry key and never
/// extends the owner's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl_id!(OwnerId);
