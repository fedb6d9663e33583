//! Capability flags derived once from the platform's capability tier.
//!
//! The resolver, minting and crop request construction read these as plain
//! data instead of comparing version numbers at every call site.

use serde::{Deserialize, Serialize};

/// First API level exposing document references.
pub const DOCUMENT_REFERENCES_MIN_API: u32 = 19;
/// First API level where sharing a local file requires a provider-minted reference.
pub const PROVIDER_REFERENCES_MIN_API: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Document providers issue `/document/<id>` references that need decoding.
    pub document_references: bool,
    /// Local files handed to another process must be provider-minted references.
    pub provider_references: bool,
}

impl Capabilities {
    pub fn for_api_level(level: u32) -> Self {
        Self {
            document_references: level >= DOCUMENT_REFERENCES_MIN_API,
            provider_references: level >= PROVIDER_REFERENCES_MIN_API,
        }
    }

    pub fn modern() -> Self {
        Self {
            document_references: true,
            provider_references: true,
        }
    }

    pub fn legacy() -> Self {
        Self {
            document_references: false,
            provider_references: false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::modern()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_api_level_boundaries() {
        assert_eq!(Capabilities::for_api_level(18), Capabilities::legacy());
        assert_eq!(
            Capabilities::for_api_level(19),
            Capabilities {
                document_references: true,
                provider_references: false,
            }
        );
        assert_eq!(Capabilities::for_api_level(23).provider_references, false);
        assert_eq!(Capabilities::for_api_level(24), Capabilities::modern());
    }
}
