use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Content-type tag used for share requests, delegation filters and resolver hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Text,
    Image,
    Audio,
    Video,
    File,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Image => "image/*",
            ContentType::Audio => "audio/*",
            ContentType::Video => "video/*",
            ContentType::File => "*/*",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown content type: {0}")]
pub struct UnknownContentType(pub String);

impl FromStr for ContentType {
    type Err = UnknownContentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text/plain" | "text" => Ok(ContentType::Text),
            "image/*" | "image" => Ok(ContentType::Image),
            "audio/*" | "audio" => Ok(ContentType::Audio),
            "video/*" | "video" => Ok(ContentType::Video),
            "*/*" | "file" => Ok(ContentType::File),
            other => Err(UnknownContentType(other.to_string())),
        }
    }
}
