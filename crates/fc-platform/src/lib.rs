//! Desktop adapters for the filechooser ports.
//!
//! These stand in for the host platform when the chooser runs outside a
//! device: the storage layout comes from `dirs`, the content index lives in
//! memory and images go through the `image` crate.

pub mod capability;
pub mod content_index;
pub mod image_codec;
pub mod local_provider;
pub mod storage_dirs;
pub mod system_clock;

pub use capability::{detect_capabilities, API_LEVEL_ENV};
pub use content_index::{ContentRow, InMemoryContentIndex};
pub use image_codec::ImageCrateCodec;
pub use local_provider::{LocalContentStreams, LocalFileProvider};
pub use storage_dirs::{DirsStorageAdapter, StorageOverrides};
pub use system_clock::SystemClock;
