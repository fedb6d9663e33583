//! Strategies for the platform's own document providers.

use std::path::PathBuf;

use tracing::debug;

use fc_core::authority::{
    MediaKind, DOWNLOAD_TABLES, HOME_VOLUME, HOME_VOLUME_DIR, PRIMARY_VOLUME,
    RAW_DOCUMENT_PREFIX,
};
use fc_core::ports::Selection;
use fc_core::{ContentRef, ContentType, ResolvedLocation};

use super::cache_copy::copy_to_cache;
use super::{query_data, AuthorityStrategy, ResolverContext, StrategyOutcome, StrategyPriority};

fn existing(path: PathBuf) -> StrategyOutcome {
    if path.exists() {
        StrategyOutcome::Resolved(ResolvedLocation::Path(path))
    } else {
        debug!(path = %path.display(), "decoded path does not exist");
        StrategyOutcome::Fallthrough
    }
}

/// `volume:relative` ids of the storage documents provider.
pub struct ExternalStorageDocuments;

impl AuthorityStrategy for ExternalStorageDocuments {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Document
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome {
        let Some(id) = reference.document_id() else {
            return StrategyOutcome::Fallthrough;
        };
        let Some((volume, relative)) = id.split_once(':') else {
            return StrategyOutcome::Fallthrough;
        };
        let relative = relative.trim_start_matches('/');

        let base = if volume.eq_ignore_ascii_case(PRIMARY_VOLUME) {
            ctx.storage.external_root.clone()
        } else if volume.eq_ignore_ascii_case(HOME_VOLUME) {
            ctx.storage.external_root.join(HOME_VOLUME_DIR)
        } else if !volume.is_empty() && !volume.contains(['/', '\\']) && volume != ".." {
            ctx.storage.volumes_root.join(volume)
        } else {
            return StrategyOutcome::Fallthrough;
        };
        existing(base.join(relative))
    }
}

/// Downloads provider: raw paths, the download tables, then a cache copy.
pub struct DownloadsDocuments;

impl AuthorityStrategy for DownloadsDocuments {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Document
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome {
        let Some(id) = reference.document_id() else {
            return StrategyOutcome::Fallthrough;
        };

        if let Some(raw) = id.strip_prefix(RAW_DOCUMENT_PREFIX) {
            return StrategyOutcome::Resolved(ResolvedLocation::Path(PathBuf::from(raw)));
        }

        if let Ok(numeric) = id.parse::<u64>() {
            for table in DOWNLOAD_TABLES {
                let Ok(table_ref) = ContentRef::parse(table) else {
                    continue;
                };
                let candidate = table_ref.with_appended_id(numeric);
                if let Some(path) = query_data(ctx, &candidate, None) {
                    return StrategyOutcome::Resolved(ResolvedLocation::Path(path));
                }
            }
        }

        match copy_to_cache(reference, &id, ctx) {
            Some(path) => StrategyOutcome::Resolved(ResolvedLocation::Path(path)),
            None => StrategyOutcome::Fallthrough,
        }
    }
}

/// Media provider ids of the form `kind:numericId`.
pub struct MediaDocuments;

impl MediaDocuments {
    fn kind_for(kind: &str, hint: Option<ContentType>) -> MediaKind {
        match (MediaKind::from_document_kind(kind), hint) {
            (MediaKind::Other, Some(ContentType::Image)) => MediaKind::Image,
            (MediaKind::Other, Some(ContentType::Video)) => MediaKind::Video,
            (MediaKind::Other, Some(ContentType::Audio)) => MediaKind::Audio,
            (kind, _) => kind,
        }
    }
}

impl AuthorityStrategy for MediaDocuments {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Document
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome {
        let Some(id) = reference.document_id() else {
            return StrategyOutcome::Fallthrough;
        };
        let Some((kind, numeric)) = id.split_once(':') else {
            return StrategyOutcome::Fallthrough;
        };

        let Ok(collection) = ContentRef::parse(Self::kind_for(kind, hint).collection()) else {
            return StrategyOutcome::Fallthrough;
        };
        match query_data(ctx, &collection, Some(&Selection::by_id(numeric))) {
            Some(path) => existing(path),
            None => StrategyOutcome::Fallthrough,
        }
    }
}
