//! Reference resolution: opaque reference → local path.
//!
//! Order:
//! 1. document-provider strategy for the authority (document tiers only)
//! 2. file scheme
//! 3. root marker (`content://<x>/root/<path>`)
//! 4. provider strategy for the authority
//! 5. universal fallback (`_data` of the reference itself)
//!
//! Resolution never fails loudly: provider errors are logged and treated as
//! "no result" for the step that hit them.

mod cache_copy;
mod documents;
mod third_party;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use fc_core::authority::{
    columns, DOWNLOADS_DOCUMENTS, EXTERNAL_STORAGE_DOCUMENTS, EZ_FILE_MANAGER_DOCUMENTS,
    GOOGLE_PHOTOS_CONTENT, MEDIA_DOCUMENTS, QQ_BROWSER_PROVIDER, ROOT_MARKER,
};
use fc_core::ports::{ContentQueryPort, ContentStreamPort, Selection};
use fc_core::{Capabilities, ContentRef, ContentType, FileProviderRoots, ResolvedLocation, StorageDirs};

pub use cache_copy::unique_file_in;
pub use documents::{DownloadsDocuments, ExternalStorageDocuments, MediaDocuments};
pub use third_party::{EsFileExplorer, GooglePhotos, OwnFileProvider, QqBrowser};

/// Everything a strategy may consult.
pub struct ResolverContext {
    pub capabilities: Capabilities,
    pub storage: StorageDirs,
    pub query: Arc<dyn ContentQueryPort>,
    pub streams: Arc<dyn ContentStreamPort>,
}

/// Where in the resolution order a strategy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPriority {
    /// Before the scheme checks, only for document references on document tiers.
    Document,
    /// After the scheme checks.
    Provider,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Resolved(ResolvedLocation),
    /// Stop without a location; the universal fallback is skipped.
    Unresolved,
    /// Let the universal fallback try.
    Fallthrough,
}

/// Per-authority decoding rule.
pub trait AuthorityStrategy: Send + Sync {
    fn priority(&self) -> StrategyPriority;

    fn resolve(
        &self,
        reference: &ContentRef,
        hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome;
}

/// `_data` of the first row matching `selection`, empty values counting as none.
pub(crate) fn query_data(
    ctx: &ResolverContext,
    reference: &ContentRef,
    selection: Option<&Selection>,
) -> Option<PathBuf> {
    match ctx.query.query_column(reference, columns::DATA, selection) {
        Ok(Some(data)) if !data.is_empty() => Some(PathBuf::from(data)),
        Ok(_) => None,
        Err(e) => {
            debug!(reference = %reference, error = %e, "data column query failed");
            None
        }
    }
}

pub struct ReferenceResolver {
    context: ResolverContext,
    strategies: HashMap<String, Arc<dyn AuthorityStrategy>>,
}

impl ReferenceResolver {
    /// Resolver with an empty strategy table: scheme checks and the fallback only.
    pub fn new(context: ResolverContext) -> Self {
        Self {
            context,
            strategies: HashMap::new(),
        }
    }

    /// Resolver knowing the platform document providers and the third-party
    /// providers with a known path layout.
    pub fn with_default_strategies(context: ResolverContext) -> Self {
        let mut resolver = Self::new(context);
        resolver.register(EXTERNAL_STORAGE_DOCUMENTS, Arc::new(ExternalStorageDocuments));
        resolver.register(DOWNLOADS_DOCUMENTS, Arc::new(DownloadsDocuments));
        resolver.register(MEDIA_DOCUMENTS, Arc::new(MediaDocuments));
        resolver.register(EZ_FILE_MANAGER_DOCUMENTS, Arc::new(EsFileExplorer));
        resolver.register(QQ_BROWSER_PROVIDER, Arc::new(QqBrowser));
        resolver.register(GOOGLE_PHOTOS_CONTENT, Arc::new(GooglePhotos));
        resolver
    }

    /// Register `strategy` for `authority`, returning the one it replaces.
    pub fn register(
        &mut self,
        authority: impl Into<String>,
        strategy: Arc<dyn AuthorityStrategy>,
    ) -> Option<Arc<dyn AuthorityStrategy>> {
        self.strategies.insert(authority.into(), strategy)
    }

    /// Resolve references minted by the host's own file provider.
    pub fn register_file_provider(&mut self, authority: impl Into<String>, roots: FileProviderRoots) {
        self.register(authority, Arc::new(OwnFileProvider::new(roots)));
    }

    pub fn context(&self) -> &ResolverContext {
        &self.context
    }

    pub fn resolve(
        &self,
        reference: &ContentRef,
        hint: Option<ContentType>,
    ) -> Option<ResolvedLocation> {
        let strategy = reference
            .authority()
            .and_then(|authority| self.strategies.get(authority));

        if let Some(strategy) = strategy.filter(|s| s.priority() == StrategyPriority::Document) {
            if self.context.capabilities.document_references && reference.document_id().is_some() {
                return self.finish(reference, strategy.resolve(reference, hint, &self.context));
            }
        }

        if reference.is_file() {
            return reference.to_file_path().map(ResolvedLocation::Path);
        }

        if let Some(path) = Self::root_marker_path(reference) {
            return Some(ResolvedLocation::Path(path));
        }

        if let Some(strategy) = strategy.filter(|s| s.priority() == StrategyPriority::Provider) {
            return self.finish(reference, strategy.resolve(reference, hint, &self.context));
        }

        self.fallback(reference)
    }

    /// [`resolve`](Self::resolve) restricted to filesystem paths.
    pub fn resolve_path(&self, reference: &ContentRef, hint: Option<ContentType>) -> Option<PathBuf> {
        self.resolve(reference, hint).and_then(ResolvedLocation::into_path)
    }

    fn finish(&self, reference: &ContentRef, outcome: StrategyOutcome) -> Option<ResolvedLocation> {
        match outcome {
            StrategyOutcome::Resolved(location) => Some(location),
            StrategyOutcome::Unresolved => None,
            StrategyOutcome::Fallthrough => self.fallback(reference),
        }
    }

    fn root_marker_path(reference: &ContentRef) -> Option<PathBuf> {
        if !reference.is_content() {
            return None;
        }
        let segments = reference.path_segments();
        let (first, rest) = segments.split_first()?;
        if first != ROOT_MARKER || rest.is_empty() {
            return None;
        }
        Some(PathBuf::from(format!("/{}", rest.join("/"))))
    }

    fn fallback(&self, reference: &ContentRef) -> Option<ResolvedLocation> {
        let path = if reference.is_content() {
            query_data(&self.context, reference, None)
        } else if reference.is_file() {
            reference.to_file_path()
        } else {
            warn!(reference = %reference, "unsupported reference scheme");
            None
        };
        if path.is_none() {
            debug!(reference = %reference, "reference is unresolvable");
        }
        path.map(ResolvedLocation::Path)
    }
}
