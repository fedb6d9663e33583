//! filechooser application layer
//!
//! Use cases and runtime orchestration on top of `fc-core` ports: reference
//! resolution, reference minting, the per-owner acquisition coordinator and the
//! share dispatcher.

pub mod usecases;

pub use usecases::acquisition::{
    AcquisitionCoordinator, AcquisitionServices, ChooseCallback, ChooserHandle,
};
pub use usecases::mint_reference::MintReferenceUseCase;
pub use usecases::resolve_reference::{
    AuthorityStrategy, ReferenceResolver, ResolverContext, StrategyOutcome, StrategyPriority,
};
pub use usecases::share::ShareDispatcher;
