//! Local file provider and byte streams.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fc_core::authority::columns;
use fc_core::ports::{ContentQueryPort, ContentStreamPort, MintError, QueryError, ReferenceMintPort};
use fc_core::{ContentRef, FileProviderRoots};

/// Mints `content://<authority>/<root>/<relative path>` references over a
/// fixed set of provider roots.
pub struct LocalFileProvider {
    roots: FileProviderRoots,
}

impl LocalFileProvider {
    pub fn new(roots: FileProviderRoots) -> Self {
        Self { roots }
    }
}

impl ReferenceMintPort for LocalFileProvider {
    fn mint(&self, path: &Path, authority: &str) -> Result<ContentRef, MintError> {
        let reference = self.roots.mint(path, authority)?;
        tracing::debug!(path = %path.display(), reference = %reference, "minted provider reference");
        Ok(reference)
    }
}

/// Opens references by path: file references directly, content references
/// through their `_data` column, provider references through the roots.
pub struct LocalContentStreams {
    index: Arc<dyn ContentQueryPort>,
    provider: Option<(String, FileProviderRoots)>,
}

impl LocalContentStreams {
    pub fn new(index: Arc<dyn ContentQueryPort>) -> Self {
        Self {
            index,
            provider: None,
        }
    }

    /// Also serve references minted under `authority`.
    pub fn with_provider(mut self, authority: impl Into<String>, roots: FileProviderRoots) -> Self {
        self.provider = Some((authority.into(), roots));
        self
    }

    fn backing_path(&self, reference: &ContentRef) -> Result<PathBuf, QueryError> {
        if let Some(path) = reference.to_file_path() {
            return Ok(path);
        }
        if let Some((authority, roots)) = &self.provider {
            if reference.authority() == Some(authority.as_str()) {
                return roots
                    .locate(reference)
                    .ok_or_else(|| QueryError::Unsupported(reference.to_string()));
            }
        }
        self.index
            .query_column(reference, columns::DATA, None)?
            .filter(|data| !data.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| QueryError::Unsupported(reference.to_string()))
    }
}

impl ContentStreamPort for LocalContentStreams {
    fn open(&self, reference: &ContentRef) -> Result<Box<dyn Read>, QueryError> {
        let path = self.backing_path(reference)?;
        let file = File::open(&path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}
