//! Single-threaded execution context.
//!
//! # Responsibility
//! - Queue deferred actions and run them on the owning thread.
//! - Supply the delays deferred actions are scheduled with.
//!
//! # Invariants
//! - A queued action runs at most once and never before its deadline
//!   (except through the explicit `run_next` override).
//! - Nothing here blocks; real-time pacing is the caller's concern.

pub mod delay;
pub mod event_loop;
