//! Entity lifetime contracts observed from callbacks.
//!
//! # Responsibility
//! - Schedule an entity's own deletion on the event loop.
//! - Build the callbacks that read an entity from UI triggers.
//!
//! # Invariants
//! - Deferred actions capture weak handles, never strong or raw ones.
//! - The guarded reader never dereferences an invalid handle.

pub mod access;
#[cfg(feature = "hazard-demo")]
#[allow(unsafe_code)]
pub mod hazard;
pub mod self_destruct;
