use std::path::PathBuf;

use super::mode::StepMode;
use super::request_codes::RequestCodes;
use crate::authority::default_file_provider_authority;
use crate::reference::ContentRef;

pub const DEFAULT_CROP_SIZE: u32 = 200;

/// Per-owner acquisition parameters, mutated in place by the chooser builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: StepMode,
    /// Chain a square crop after the source step.
    pub crop: bool,
    pub crop_size: u32,
    /// Where the crop step writes. Generated on first use when unset.
    pub crop_output: Option<PathBuf>,
    /// Where the camera writes. Generated on first camera launch when unset.
    pub camera_output: Option<ContentRef>,
    pub codes: RequestCodes,
    /// Decode the result into pixels for the callback.
    pub as_image: bool,
    /// File-provider authority used when minting references.
    pub authority: String,
}

/// Host-wide values applied to every new session before the builder touches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDefaults {
    pub crop_size: Option<u32>,
    pub as_image: bool,
    pub codes: RequestCodes,
    /// Overrides the package-derived authority when set.
    pub authority: Option<String>,
}

impl SessionConfig {
    pub fn with_defaults(package_id: &str, defaults: &SessionDefaults) -> Self {
        let mut config = Self::for_package(package_id);
        if let Some(size) = defaults.crop_size.filter(|size| *size > 0) {
            config.crop_size = size;
        }
        config.as_image = defaults.as_image;
        config.codes = defaults.codes;
        if let Some(authority) = defaults
            .authority
            .as_deref()
            .filter(|a| !a.trim().is_empty())
        {
            config.authority = authority.to_string();
        }
        config
    }

    pub fn for_package(package_id: &str) -> Self {
        Self {
            mode: StepMode::default(),
            crop: false,
            crop_size: DEFAULT_CROP_SIZE,
            crop_output: None,
            camera_output: None,
            codes: RequestCodes::default(),
            as_image: false,
            authority: default_file_provider_authority(package_id),
        }
    }

    /// Clear the non-parameter flags. Codes, authority and locations survive.
    pub fn reset_flags(&mut self) {
        self.crop = false;
        self.as_image = false;
    }
}
