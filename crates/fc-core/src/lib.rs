//! # fc-core
//!
//! Core domain models and business logic for filechooser.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! opaque references, capability flags, the acquisition state machine and the
//! port traits implemented by the platform layer.

// Public module exports
pub mod acquisition;
pub mod authority;
pub mod capability;
pub mod config;
pub mod content_type;
pub mod file_kind;
pub mod file_provider;
pub mod ids;
pub mod image;
pub mod owner;
pub mod ports;
pub mod reference;
pub mod share;
pub mod storage;

// Re-export commonly used types at the crate root
pub use acquisition::{
    AcquisitionAction, AcquisitionEvent, AcquisitionState, AcquisitionStateMachine, ChooseOutcome,
    ChooseStatus, CompletionPayload, RequestCodes, ResultCode, SessionConfig, SessionDefaults, Step,
    StepMode,
};
pub use capability::Capabilities;
pub use config::ChooserConfig;
pub use content_type::ContentType;
pub use file_provider::FileProviderRoots;
pub use ids::OwnerId;
pub use image::DecodedImage;
pub use owner::{Owner, OwnerKind};
pub use reference::{ContentRef, ReferenceError, ResolvedLocation};
pub use storage::StorageDirs;
