//! In-memory content index.
//!
//! Rows are grouped by collection reference. A query against an item
//! reference (`<collection>/<id>`) matches the row with that `_id`, mirroring
//! how the platform's content providers answer.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use tracing::debug;

use fc_core::authority::columns;
use fc_core::ports::{ContentQueryPort, QueryError, Selection};
use fc_core::ContentRef;

pub const MIME_TYPE_COLUMN: &str = "mime_type";

pub type ContentRow = HashMap<String, String>;

#[derive(Default)]
pub struct InMemoryContentIndex {
    collections: RwLock<HashMap<String, Vec<ContentRow>>>,
}

fn guess_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(mime)
}

/// Row describing a file: `_id`, `_data`, `_display_name` and, when the
/// extension is known, `mime_type`.
pub fn file_row(id: u64, path: &Path) -> ContentRow {
    let mut row = ContentRow::new();
    row.insert(columns::ID.to_string(), id.to_string());
    row.insert(columns::DATA.to_string(), path.to_string_lossy().into_owned());
    if let Some(name) = path.file_name() {
        row.insert(
            columns::DISPLAY_NAME.to_string(),
            name.to_string_lossy().into_owned(),
        );
    }
    if let Some(mime) = guess_mime(path) {
        row.insert(MIME_TYPE_COLUMN.to_string(), mime.to_string());
    }
    row
}

fn poisoned() -> QueryError {
    QueryError::Provider("content index lock poisoned".to_string())
}

impl InMemoryContentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, collection: &ContentRef, row: ContentRow) -> Result<(), QueryError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        collections
            .entry(collection.as_str().to_string())
            .or_default()
            .push(row);
        Ok(())
    }

    /// Index `path` under `collection` with row id `id`.
    pub fn insert_file(&self, collection: &ContentRef, id: u64, path: &Path) -> Result<(), QueryError> {
        self.insert(collection, file_row(id, path))
    }

    /// Index every regular file directly inside `dir`, numbering rows after
    /// the collection's current size. Returns how many files were added.
    pub fn index_directory(&self, collection: &ContentRef, dir: &Path) -> Result<usize, QueryError> {
        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let rows = collections.entry(collection.as_str().to_string()).or_default();
        let first_id = rows.len() as u64 + 1;
        for (offset, path) in paths.iter().enumerate() {
            rows.push(file_row(first_id + offset as u64, path));
        }
        debug!(collection = %collection, dir = %dir.display(), count = paths.len(), "indexed directory");
        Ok(paths.len())
    }

    /// Collection key and `_id` filter implied by an item reference.
    fn item_lookup(reference: &ContentRef) -> Option<(&str, &str)> {
        reference
            .as_str()
            .rsplit_once('/')
            .filter(|(_, id)| !id.is_empty())
    }

    fn matches(row: &ContentRow, selection: Option<&Selection>) -> Result<bool, QueryError> {
        let Some(selection) = selection else {
            return Ok(true);
        };
        match selection.id_arg() {
            Some(id) => Ok(row.get(columns::ID).map(String::as_str) == Some(id)),
            None => Err(QueryError::Unsupported(selection.clause.clone())),
        }
    }

    fn find(
        &self,
        reference: &ContentRef,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, QueryError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;

        if let Some(rows) = collections.get(reference.as_str()) {
            for row in rows {
                if Self::matches(row, selection)? {
                    return Ok(row.get(column).cloned());
                }
            }
            return Ok(None);
        }

        let Some((key, id)) = Self::item_lookup(reference) else {
            return Ok(None);
        };
        let Some(rows) = collections.get(key) else {
            return Ok(None);
        };
        let by_id = Selection::by_id(id);
        for row in rows {
            if Self::matches(row, Some(&by_id))? && Self::matches(row, selection)? {
                return Ok(row.get(column).cloned());
            }
        }
        Ok(None)
    }
}

impl ContentQueryPort for InMemoryContentIndex {
    fn query_column(
        &self,
        reference: &ContentRef,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, QueryError> {
        self.find(reference, column, selection)
    }

    fn content_type(&self, reference: &ContentRef) -> Result<Option<String>, QueryError> {
        self.find(reference, MIME_TYPE_COLUMN, None)
    }
}
