//! Outbound share requests.
//!
//! A [`ShareRequest`] is only obtainable through [`ShareRequestBuilder::build`],
//! so every request reaching a [`SharePort`](crate::ports::SharePort) is valid.

use thiserror::Error;

use crate::content_type::ContentType;
use crate::reference::ContentRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("text share has no text")]
    EmptyText,

    #[error("{0} share has no references")]
    NoReferences(ContentType),

    #[error("{0} cannot be shared")]
    UnsupportedContentType(ContentType),

    #[error("share dispatch failed: {0}")]
    Dispatch(String),
}

/// Which application receives the share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareTarget {
    /// Let the system (or the user) decide.
    Any,
    Package(String),
    Component { package: String, class: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    content_type: ContentType,
    title: Option<String>,
    text: Option<String>,
    references: Vec<ContentRef>,
    target: ShareTarget,
    request_code: Option<i32>,
    system_chooser: bool,
}

impl ShareRequest {
    pub fn builder(content_type: ContentType) -> ShareRequestBuilder {
        ShareRequestBuilder::new(content_type)
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn mime(&self) -> &'static str {
        self.content_type.mime()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn references(&self) -> &[ContentRef] {
        &self.references
    }

    pub fn target(&self) -> &ShareTarget {
        &self.target
    }

    pub fn request_code(&self) -> Option<i32> {
        self.request_code
    }

    /// Wrap the share in the system chooser even when a default handler exists.
    pub fn system_chooser(&self) -> bool {
        self.system_chooser
    }

    pub fn is_multiple(&self) -> bool {
        self.references.len() > 1
    }
}

#[derive(Debug, Clone)]
pub struct ShareRequestBuilder {
    content_type: ContentType,
    title: Option<String>,
    text: Option<String>,
    references: Vec<ContentRef>,
    package: Option<String>,
    component: Option<(String, String)>,
    request_code: Option<i32>,
    system_chooser: bool,
}

impl ShareRequestBuilder {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            title: None,
            text: None,
            references: Vec::new(),
            package: None,
            component: None,
            request_code: None,
            system_chooser: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a reference. Duplicates are ignored.
    pub fn reference(mut self, reference: ContentRef) -> Self {
        if !self.references.contains(&reference) {
            self.references.push(reference);
        }
        self
    }

    pub fn references(self, references: impl IntoIterator<Item = ContentRef>) -> Self {
        references.into_iter().fold(self, Self::reference)
    }

    pub fn target_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Explicit component. Takes priority over [`target_package`](Self::target_package).
    pub fn target_component(mut self, package: impl Into<String>, class: impl Into<String>) -> Self {
        self.component = Some((package.into(), class.into()));
        self
    }

    pub fn request_code(mut self, code: i32) -> Self {
        self.request_code = Some(code);
        self
    }

    pub fn system_chooser(mut self, forced: bool) -> Self {
        self.system_chooser = forced;
        self
    }

    pub fn build(self) -> Result<ShareRequest, ShareError> {
        match self.content_type {
            ContentType::Text => {
                if self.text.as_deref().map_or(true, |t| t.trim().is_empty()) {
                    return Err(ShareError::EmptyText);
                }
            }
            ContentType::Image | ContentType::File => {
                if self.references.is_empty() {
                    return Err(ShareError::NoReferences(self.content_type));
                }
            }
            ContentType::Audio | ContentType::Video => {
                return Err(ShareError::UnsupportedContentType(self.content_type));
            }
        }

        let target = match (self.component, self.package) {
            (Some((package, class)), _) => ShareTarget::Component { package, class },
            (None, Some(package)) => ShareTarget::Package(package),
            (None, None) => ShareTarget::Any,
        };

        Ok(ShareRequest {
            content_type: self.content_type,
            title: self.title,
            text: self.text,
            references: self.references,
            target,
            request_code: self.request_code,
            system_chooser: self.system_chooser,
        })
    }
}
