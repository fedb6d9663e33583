//! Per-owner acquisition sessions.
//!
//! The coordinator keeps one session per owner, created by the first
//! [`AcquisitionCoordinator::with`] call and dropped only by
//! [`AcquisitionCoordinator::release`].

mod coordinator;
mod handle;
mod session;

pub use coordinator::{AcquisitionCoordinator, AcquisitionServices};
pub use handle::ChooserHandle;
pub use session::ChooseCallback;
