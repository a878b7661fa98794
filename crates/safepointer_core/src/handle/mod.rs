//! Observation handles.
//!
//! `weak` is the sanctioned way to reach an entity from a callback. `raw`
//! exists only in `hazard-demo` builds to show what goes wrong without it.

#[cfg(feature = "hazard-demo")]
#[allow(unsafe_code)]
pub mod raw;
pub mod weak;
