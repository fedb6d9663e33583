//! Opaque resource references.
//!
//! A [`ContentRef`] is a handle issued by the OS or a provider. It is *not* a
//! filesystem path, and nothing in this crate dereferences it directly; turning
//! it into a path is the job of the resolver in `fc-app`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

pub const SCHEME_CONTENT: &str = "content";
pub const SCHEME_FILE: &str = "file";

const DOCUMENT_SEGMENT: &str = "document";
const TREE_SEGMENT: &str = "tree";

fn decode_lossy(encoded: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(encoded.as_bytes())).into_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("malformed reference `{input}`: {reason}")]
    Malformed { input: String, reason: String },

    #[error("path is not absolute: {0}")]
    NotAbsolute(PathBuf),

    #[error("reference cannot carry path segments: {0}")]
    CannotBeABase(String),
}

/// Provider-issued handle identifying a resource.
///
/// Identity is scheme + authority + path segments, compared on the encoded form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentRef(Url);

impl ContentRef {
    pub fn parse(input: &str) -> Result<Self, ReferenceError> {
        Url::parse(input)
            .map(Self)
            .map_err(|e| ReferenceError::Malformed {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Direct local-file reference (`file:///...`).
    pub fn from_file_path(path: &Path) -> Result<Self, ReferenceError> {
        Url::from_file_path(path)
            .map(Self)
            .map_err(|_| ReferenceError::NotAbsolute(path.to_path_buf()))
    }

    /// Build `content://<authority>/<seg>/<seg>...`, percent-encoding each segment.
    pub fn content<S: AsRef<str>>(authority: &str, segments: &[S]) -> Result<Self, ReferenceError> {
        let input = format!("{SCHEME_CONTENT}://{authority}");
        let mut url = Url::parse(&input).map_err(|e| ReferenceError::Malformed {
            input: input.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ReferenceError::CannotBeABase(input.clone()))?
            .extend(segments.iter().map(|s| s.as_ref()));
        Ok(Self(url))
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn is_content(&self) -> bool {
        self.0.scheme().eq_ignore_ascii_case(SCHEME_CONTENT)
    }

    pub fn is_file(&self) -> bool {
        self.0.scheme().eq_ignore_ascii_case(SCHEME_FILE)
    }

    /// Provider authority, `None` for references without a host (e.g. `file:///`).
    pub fn authority(&self) -> Option<&str> {
        self.0.host_str().filter(|host| !host.is_empty())
    }

    /// Decoded path component.
    pub fn decoded_path(&self) -> String {
        decode_lossy(self.0.path())
    }

    /// Decoded, non-empty path segments.
    pub fn path_segments(&self) -> Vec<String> {
        self.0
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(decode_lossy)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn last_path_segment(&self) -> Option<String> {
        self.path_segments().pop()
    }

    /// Document id of a document-shaped reference.
    ///
    /// Accepts `/document/<id>` and `/tree/<tree>/document/<id>`; anything else
    /// is not a document reference.
    pub fn document_id(&self) -> Option<String> {
        let segments = self.path_segments();
        match segments.as_slice() {
            [doc, id] if doc == DOCUMENT_SEGMENT => Some(id.clone()),
            [tree, _, doc, id] if tree == TREE_SEGMENT && doc == DOCUMENT_SEGMENT => {
                Some(id.clone())
            }
            _ => None,
        }
    }

    /// Append a numeric row id as a new path segment.
    pub fn with_appended_id(&self, id: u64) -> Self {
        let mut url = self.0.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&id.to_string());
        }
        Self(url)
    }

    /// Local path for `file` references.
    pub fn to_file_path(&self) -> Option<PathBuf> {
        if !self.is_file() {
            return None;
        }
        self.0.to_file_path().ok()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for ContentRef {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentRef {
    type Error = ReferenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentRef> for String {
    fn from(reference: ContentRef) -> Self {
        reference.0.into()
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedLocation {
    /// Absolute local path.
    Path(PathBuf),
    /// Opaque display identifier for references that are not filesystem-backed.
    /// Never use it for I/O.
    DisplayId(String),
}

impl ResolvedLocation {
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            ResolvedLocation::Path(path) => Some(path),
            ResolvedLocation::DisplayId(_) => None,
        }
    }
}
