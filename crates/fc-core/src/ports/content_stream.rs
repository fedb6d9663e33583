use std::io::Read;

use super::content_query::QueryError;
use crate::reference::ContentRef;

/// Opens the byte stream behind a reference.
///
/// Used by the download fallback that copies unresolvable documents into the cache.
pub trait ContentStreamPort: Send + Sync {
    fn open(&self, reference: &ContentRef) -> Result<Box<dyn Read>, QueryError>;
}
