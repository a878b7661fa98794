//! Exclusive ownership of entities.
//!
//! # Responsibility
//! - Own every entity through the only strong reference in the process.
//! - Funnel every deletion path through one at-most-once operation.
//!
//! # Invariants
//! - A strong reference never leaves the store; observers get `WeakHandle`s.
//! - Destroying an id twice is a no-op the second time.

pub mod entity_store;
