//! Business logic use cases
//!
//! open()
//!   ↓
//! AcquisitionCoordinator ── DelegationPort ──▶ external step
//!   ↑                                              │
//!   └──────────── on_completion(code) ◀────────────┘
//!   ↓
//! ReferenceResolver / MintReferenceUseCase → callback

pub mod acquisition;
pub mod mint_reference;
pub mod resolve_reference;
pub mod share;
