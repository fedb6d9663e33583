use serde::{Deserialize, Serialize};

use crate::ids::OwnerId;

/// Which registry an owner lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerKind {
    /// Top-level window / screen.
    Activity,
    /// Embedded screen fragment.
    Fragment,
}

/// Identity of whoever requested an acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Owner {
    pub kind: OwnerKind,
    pub id: OwnerId,
    /// Package id of the host application, used for the default provider authority.
    pub package_id: String,
}

impl Owner {
    pub fn activity(id: impl Into<OwnerId>, package_id: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::Activity,
            id: id.into(),
            package_id: package_id.into(),
        }
    }

    pub fn fragment(id: impl Into<OwnerId>, package_id: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::Fragment,
            id: id.into(),
            package_id: package_id.into(),
        }
    }
}
