//! Domain model for lifetime-tracked entities.
//!
//! # Responsibility
//! - Define the entity whose lifetime the rest of the crate observes.
//! - Provide a serializable snapshot for reporting.
//!
//! # Invariants
//! - Every entity is identified by a stable `EntityId`.
//! - Entities are never cloned; identity and lifetime are one-to-one.

pub mod entity;
