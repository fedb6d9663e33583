//! filechooser
//!
//! Acquire images and documents through gallery, camera and file-picker steps,
//! resolve provider references to local paths and hand content to share
//! targets. This crate only assembles the workspace crates; see `bootstrap`.
//!
//! 文件选择库：组装 fc-core / fc-app / fc-platform。

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, load_config, wire_dependencies, ChooserDeps};
pub use fc_app::{AcquisitionCoordinator, ChooserHandle, ReferenceResolver, ShareDispatcher};
pub use fc_core::{ChooseOutcome, ChooserConfig, ContentRef, Owner};
