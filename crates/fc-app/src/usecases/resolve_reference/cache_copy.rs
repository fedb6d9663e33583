//! Byte-copy fallback for documents whose path cannot be queried.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use fc_core::authority::columns;
use fc_core::ContentRef;

use super::ResolverContext;

/// Create a new empty file named `name` in `dir`, appending `(n)` before the
/// extension until the name is free. `dir` is created if missing.
pub fn unique_file_in(dir: &Path, name: &str) -> io::Result<(PathBuf, File)> {
    fs::create_dir_all(dir)?;

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 => name.split_at(dot),
        _ => (name, ""),
    };

    let mut candidate = name.to_string();
    let mut index = 0u32;
    loop {
        let path = dir.join(&candidate);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                index += 1;
                candidate = format!("{stem}({index}){extension}");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Name for the cached copy: the provider's display name when it reports a
/// type, else the document id. Only the final path component is kept.
fn cache_file_name(reference: &ContentRef, id: &str, ctx: &ResolverContext) -> String {
    let typed = matches!(ctx.query.content_type(reference), Ok(Some(_)));
    let display_name = if typed {
        ctx.query
            .query_column(reference, columns::DISPLAY_NAME, None)
            .unwrap_or_else(|e| {
                debug!(reference = %reference, error = %e, "display name query failed");
                None
            })
    } else {
        None
    };

    display_name
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(id)
        .to_string()
}

/// Copy the reference's bytes into `<cache>/documents` and return the new path.
pub(super) fn copy_to_cache(
    reference: &ContentRef,
    id: &str,
    ctx: &ResolverContext,
) -> Option<PathBuf> {
    let name = cache_file_name(reference, id, ctx);
    let dir = ctx.storage.documents_cache_dir();

    let (path, file) = match unique_file_in(&dir, &name) {
        Ok(created) => created,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot create cache file");
            return None;
        }
    };

    let copied = ctx
        .streams
        .open(reference)
        .map_err(|e| e.to_string())
        .and_then(|mut source| {
            let mut sink = BufWriter::new(file);
            io::copy(&mut source, &mut sink)
                .and_then(|_| sink.flush())
                .map_err(|e| e.to_string())
        });

    match copied {
        Ok(()) => {
            debug!(reference = %reference, path = %path.display(), "copied document into cache");
            Some(path)
        }
        Err(error) => {
            warn!(reference = %reference, %error, "document copy failed");
            if let Err(e) = fs::remove_file(&path) {
                debug!(path = %path.display(), error = %e, "cannot remove partial copy");
            }
            None
        }
    }
}
