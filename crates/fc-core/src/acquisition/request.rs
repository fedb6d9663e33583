use crate::authority::IMAGES_COLLECTION;
use crate::reference::{ContentRef, ReferenceError};

pub const ANY_MIME_TYPE: &str = "*/*";
pub const CROP_OUTPUT_FORMAT: &str = "JPEG";

/// System document action the file picker step uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentAction {
    /// Persistent document access; required when the pick feeds a crop.
    OpenDocument,
    GetContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropRequest {
    pub source: ContentRef,
    /// Direct file reference to the crop output path.
    pub output: ContentRef,
    pub aspect_x: u32,
    pub aspect_y: u32,
    pub output_x: u32,
    pub output_y: u32,
    pub output_format: &'static str,
    pub face_detection: bool,
    pub return_data: bool,
    /// Grant read/write on the source to the crop handler.
    pub grant_uri_permissions: bool,
}

impl CropRequest {
    /// Square crop of `size` pixels.
    pub fn square(source: ContentRef, output: ContentRef, size: u32, grant: bool) -> Self {
        Self {
            source,
            output,
            aspect_x: 1,
            aspect_y: 1,
            output_x: size,
            output_y: size,
            output_format: CROP_OUTPUT_FORMAT,
            face_detection: false,
            return_data: false,
            grant_uri_permissions: grant,
        }
    }
}

/// What to ask the host to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegationRequest {
    PickImage {
        collection: ContentRef,
    },
    CaptureImage {
        output: ContentRef,
    },
    PickDocument {
        action: DocumentAction,
        mime_type: String,
        openable: bool,
    },
    Crop(CropRequest),
}

impl DelegationRequest {
    pub fn pick_image() -> Result<Self, ReferenceError> {
        Ok(DelegationRequest::PickImage {
            collection: ContentRef::parse(IMAGES_COLLECTION)?,
        })
    }

    pub fn pick_document(for_crop: bool) -> Self {
        DelegationRequest::PickDocument {
            action: if for_crop {
                DocumentAction::OpenDocument
            } else {
                DocumentAction::GetContent
            },
            mime_type: ANY_MIME_TYPE.to_string(),
            openable: true,
        }
    }
}
