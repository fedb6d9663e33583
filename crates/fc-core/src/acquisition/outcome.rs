use std::fmt;

use crate::image::DecodedImage;
use crate::reference::ContentRef;

/// Result code reported by the external step alongside its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    Canceled,
    Other(i32),
}

impl ResultCode {
    pub const RAW_OK: i32 = -1;
    pub const RAW_CANCELED: i32 = 0;

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_OK => ResultCode::Ok,
            Self::RAW_CANCELED => ResultCode::Canceled,
            other => ResultCode::Other(other),
        }
    }

    pub fn is_ok(self) -> bool {
        self == ResultCode::Ok
    }
}

/// Data an external step hands back: a direct reference, an inline image, both or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionPayload {
    pub reference: Option<ContentRef>,
    pub inline_image: Option<DecodedImage>,
}

impl CompletionPayload {
    pub fn with_reference(reference: ContentRef) -> Self {
        Self {
            reference: Some(reference),
            inline_image: None,
        }
    }

    pub fn with_inline_image(image: DecodedImage) -> Self {
        Self {
            reference: None,
            inline_image: Some(image),
        }
    }
}

/// Status of a finished acquisition cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooseStatus {
    Success,
    /// The step returned neither a reference nor an inline image.
    NoReference,
    /// Crop was requested for a file that is not a croppable image.
    UnsupportedCropInput { file_name: String },
    /// No public location exists for the camera to write to.
    MissingOutputLocation,
    /// An inline image could not be written to disk.
    PersistFailed(String),
}

impl ChooseStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ChooseStatus::Success)
    }
}

impl fmt::Display for ChooseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChooseStatus::Success => f.write_str("success"),
            ChooseStatus::NoReference => f.write_str("failed: no reference returned"),
            ChooseStatus::UnsupportedCropInput { file_name } => {
                write!(f, "failed: {file_name} is not an image and cannot be cropped")
            }
            ChooseStatus::MissingOutputLocation => {
                f.write_str("failed: no public location available for the camera output")
            }
            ChooseStatus::PersistFailed(reason) => {
                write!(f, "failed: could not save captured image: {reason}")
            }
        }
    }
}

/// The callback triple: reference, decoded image and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChooseOutcome {
    pub reference: Option<ContentRef>,
    pub image: Option<DecodedImage>,
    pub status: ChooseStatus,
}

impl ChooseOutcome {
    pub fn success(reference: Option<ContentRef>, image: Option<DecodedImage>) -> Self {
        Self {
            reference,
            image,
            status: ChooseStatus::Success,
        }
    }

    pub fn failure(status: ChooseStatus) -> Self {
        Self {
            reference: None,
            image: None,
            status,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Status string as delivered to callers.
    pub fn message(&self) -> String {
        self.status.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_result_codes() {
        assert_eq!(ResultCode::from_raw(-1), ResultCode::Ok);
        assert_eq!(ResultCode::from_raw(0), ResultCode::Canceled);
        assert_eq!(ResultCode::from_raw(5), ResultCode::Other(5));
    }

    #[test]
    fn status_strings() {
        assert_eq!(ChooseOutcome::success(None, None).message(), "success");
        let failure = ChooseOutcome::failure(ChooseStatus::UnsupportedCropInput {
            file_name: "doc.pdf".to_string(),
        });
        assert!(!failure.is_success());
        assert!(failure.message().starts_with("failed: doc.pdf"));
    }
}
