//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `fc-app` and the host
//! environment. The host (or `fc-platform` on desktop) implements them; the
//! core never talks to the OS directly.
//!
//! All ports are synchronous. Acquisition runs on the owner's single UI thread
//! and resolution blocks that thread.

mod clock;
pub mod content_query;
pub mod content_stream;
pub mod delegation;
pub mod image_codec;
pub mod mint;
pub mod share;
pub mod storage_dirs;

pub use clock::ClockPort;
pub use content_query::{ContentQueryPort, QueryError, Selection};
pub use content_stream::ContentStreamPort;
pub use delegation::{DelegationError, DelegationPort};
pub use image_codec::{CodecError, ImageCodecPort};
pub use mint::{MintError, ReferenceMintPort};
pub use share::SharePort;
pub use storage_dirs::{StorageDirsError, StorageDirsPort};
