//! Headless host component.
//!
//! # Responsibility
//! - Stand in for the UI component: own trigger subscriptions and the
//!   self-destructing entity they observe.
//! - Keep each subscription's captured state local to its closure.
//!
//! # Invariants
//! - One subscription per trigger.
//! - The `crash` trigger is only subscribed in `hazard-demo` builds.

pub mod demo;
pub mod trigger;
