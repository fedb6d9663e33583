//! Content index query port.
//!
//! A single-column, single-row lookup against a content index, the only kind
//! of query the resolver issues.

use thiserror::Error;

use crate::authority::columns;
use crate::reference::ContentRef;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("provider does not support this reference: {0}")]
    Unsupported(String),

    #[error("provider rejected query: {0}")]
    Provider(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// `WHERE` clause with positional `?` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<String>,
}

impl Selection {
    /// `_id=?` filter.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            clause: format!("{}=?", columns::ID),
            args: vec![id.into()],
        }
    }

    /// Argument of an `_id=?` filter, if this is one.
    pub fn id_arg(&self) -> Option<&str> {
        if self.clause.replace(' ', "") == format!("{}=?", columns::ID) {
            self.args.first().map(String::as_str)
        } else {
            None
        }
    }
}

pub trait ContentQueryPort: Send + Sync {
    /// First row's value of `column`, or `None` when no row matches.
    fn query_column(
        &self,
        reference: &ContentRef,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, QueryError>;

    /// MIME type the provider reports for `reference`.
    fn content_type(&self, reference: &ContentRef) -> Result<Option<String>, QueryError>;
}
