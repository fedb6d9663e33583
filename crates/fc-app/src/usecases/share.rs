use std::sync::Arc;

use tracing::{info, warn};

use fc_core::ports::SharePort;
use fc_core::share::{ShareError, ShareRequest};
use fc_core::{ContentRef, ContentType, Owner};

/// Hands validated share requests to the host.
pub struct ShareDispatcher {
    port: Arc<dyn SharePort>,
}

impl ShareDispatcher {
    pub fn new(port: Arc<dyn SharePort>) -> Self {
        Self { port }
    }

    pub fn share(&self, owner: &Owner, request: &ShareRequest) -> Result<(), ShareError> {
        info!(
            owner = %owner.id,
            mime = request.mime(),
            references = request.references().len(),
            "dispatching share"
        );
        self.port.dispatch(owner, request).map_err(|e| {
            warn!(owner = %owner.id, error = %e, "share dispatch failed");
            e
        })
    }

    /// Share a single reference through the system chooser.
    pub fn share_reference(
        &self,
        owner: &Owner,
        reference: ContentRef,
        content_type: ContentType,
    ) -> Result<(), ShareError> {
        let request = ShareRequest::builder(content_type)
            .reference(reference)
            .build()
            .map_err(|e| {
                warn!(owner = %owner.id, error = %e, "invalid share request");
                e
            })?;
        self.share(owner, &request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub Port {}

        impl SharePort for Port {
            fn dispatch(&self, owner: &Owner, request: &ShareRequest) -> Result<(), ShareError>;
        }
    }

    fn owner() -> Owner {
        Owner::activity("main", "com.pichs.app")
    }

    fn reference() -> ContentRef {
        ContentRef::parse("content://com.pichs.app.fileprovider/external/a.jpg").unwrap()
    }

    #[test]
    fn share_reference_dispatches_single_image() {
        let mut port = MockPort::new();
        port.expect_dispatch()
            .withf(|owner, request| {
                owner.id.as_str() == "main"
                    && request.mime() == "image/*"
                    && request.references() == [reference()]
                    && request.system_chooser()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let dispatcher = ShareDispatcher::new(Arc::new(port));
        dispatcher
            .share_reference(&owner(), reference(), ContentType::Image)
            .unwrap();
    }

    #[test]
    fn invalid_request_never_reaches_port() {
        let mut port = MockPort::new();
        port.expect_dispatch().never();

        let dispatcher = ShareDispatcher::new(Arc::new(port));
        let err = dispatcher
            .share_reference(&owner(), reference(), ContentType::Video)
            .unwrap_err();
        assert_eq!(err, ShareError::UnsupportedContentType(ContentType::Video));
    }

    #[test]
    fn dispatch_errors_are_returned() {
        let mut port = MockPort::new();
        port.expect_dispatch()
            .returning(|_, _| Err(ShareError::Dispatch("no share target".to_string())));

        let dispatcher = ShareDispatcher::new(Arc::new(port));
        let request = ShareRequest::builder(ContentType::Text)
            .text("hello")
            .build()
            .unwrap();
        assert!(matches!(
            dispatcher.share(&owner(), &request),
            Err(ShareError::Dispatch(_))
        ));
    }
}
