use std::path::Path;
use thiserror::Error;

use crate::image::DecodedImage;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode failed: {0}")]
    Encode(String),
}

pub trait ImageCodecPort: Send + Sync {
    /// Best-effort decode. Failure yields `None` and never propagates.
    fn decode(&self, path: &Path) -> Option<DecodedImage>;

    /// Write `image` as a JPEG file at `path`.
    fn encode_jpeg(&self, image: &DecodedImage, path: &Path) -> Result<(), CodecError>;
}
