//! Weak-reference guarded entity lifetimes on a single-threaded event loop.
//!
//! An entity deletes itself after a random delay while UI triggers read it,
//! either through a weak handle that notices the deletion or (only with the
//! `hazard-demo` feature) through a raw pointer that does not.

#![cfg_attr(not(feature = "hazard-demo"), forbid(unsafe_code))]
#![cfg_attr(feature = "hazard-demo", deny(unsafe_code))]

pub mod build_info;
pub mod component;
pub mod config;
pub mod diagnostics;
pub mod handle;
pub mod leak;
pub mod lifetime;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod store;
pub mod walkthrough;

pub use build_info::{log_project_info, plugin_name, project_info, ProjectInfo};
pub use component::demo::{ComponentError, ComponentResult, DemoComponent};
pub use component::trigger::{ParseTriggerError, Trigger};
pub use config::{ConfigError, DemoConfig, DEFAULT_ENTITY_NAME};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink, StdoutSink};
pub use handle::weak::WeakHandle;
pub use leak::{check_for_leaks, leak_report, live_count, LeakEntry, LeakGuard};
pub use lifetime::access::{describe, guarded_reader, DELETED_MESSAGE};
pub use lifetime::self_destruct::{
    spawn_self_destructing, SelfDestructTicket, SELF_DESTRUCT_MESSAGE,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::entity::{Entity, EntityId, EntitySnapshot, ENTITY_LEAK_LABEL};
pub use runtime::delay::{DelayError, DelaySource, FixedDelay, RandomDelay, DEFAULT_MAX_DELAY_MS};
pub use runtime::event_loop::{EventLoop, TaskId};
pub use store::entity_store::{DestroyOutcome, EntityStore};

#[cfg(feature = "hazard-demo")]
pub use handle::raw::RawHandle;
#[cfg(feature = "hazard-demo")]
pub use lifetime::hazard::unguarded_reader;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
