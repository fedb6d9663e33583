//! Strategies for third-party providers and the host's own file provider.

use tracing::debug;

use fc_core::{ContentRef, ContentType, FileProviderRoots, ResolvedLocation};

use super::{AuthorityStrategy, ResolverContext, StrategyOutcome, StrategyPriority};

const QQ_BROWSER_MARKER: &str = "QQBrowser";

fn under_external_root(ctx: &ResolverContext, remainder: &str) -> StrategyOutcome {
    let remainder = remainder.trim_start_matches('/');
    if remainder.is_empty() {
        return StrategyOutcome::Fallthrough;
    }
    StrategyOutcome::Resolved(ResolvedLocation::Path(
        ctx.storage.external_root.join(remainder),
    ))
}

/// ES file explorer: `/<anything>:<path under external root>`.
pub struct EsFileExplorer;

impl AuthorityStrategy for EsFileExplorer {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Provider
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome {
        let path = reference.decoded_path();
        match path.split(':').nth(1) {
            Some(remainder) => under_external_root(ctx, remainder),
            None => StrategyOutcome::Fallthrough,
        }
    }
}

/// QQ browser: everything after the `QQBrowser` marker is under external root.
pub struct QqBrowser;

impl AuthorityStrategy for QqBrowser {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Provider
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        ctx: &ResolverContext,
    ) -> StrategyOutcome {
        let path = reference.decoded_path();
        match path.split(QQ_BROWSER_MARKER).nth(1) {
            Some(remainder) => under_external_root(ctx, remainder),
            None => StrategyOutcome::Fallthrough,
        }
    }
}

/// Photo gallery references are not filesystem-backed; hand back the last
/// segment as an opaque id and stop.
pub struct GooglePhotos;

impl AuthorityStrategy for GooglePhotos {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Provider
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        _ctx: &ResolverContext,
    ) -> StrategyOutcome {
        match reference.last_path_segment() {
            Some(id) => StrategyOutcome::Resolved(ResolvedLocation::DisplayId(id)),
            None => StrategyOutcome::Unresolved,
        }
    }
}

/// The host's own file provider: inverse of minting.
pub struct OwnFileProvider {
    roots: FileProviderRoots,
}

impl OwnFileProvider {
    pub fn new(roots: FileProviderRoots) -> Self {
        Self { roots }
    }
}

impl AuthorityStrategy for OwnFileProvider {
    fn priority(&self) -> StrategyPriority {
        StrategyPriority::Provider
    }

    fn resolve(
        &self,
        reference: &ContentRef,
        _hint: Option<ContentType>,
        _ctx: &ResolverContext,
    ) -> StrategyOutcome {
        match self.roots.locate(reference) {
            Some(path) => StrategyOutcome::Resolved(ResolvedLocation::Path(path)),
            None => {
                debug!(reference = %reference, "reference outside registered provider roots");
                StrategyOutcome::Fallthrough
            }
        }
    }
}
