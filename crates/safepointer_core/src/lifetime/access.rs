//! Guarded entity access.

use crate::diagnostics::DiagnosticSink;
use crate::handle::weak::WeakHandle;
use std::rc::Rc;

/// Line reported when the observed entity no longer exists.
pub const DELETED_MESSAGE: &str = "object has been deleted";

/// Formats the line reported for a live entity.
pub fn name_line(name: &str) -> String {
    format!("Name: {name}")
}

/// Describes the entity behind `handle` without ever touching a dead one.
pub fn describe(handle: &WeakHandle) -> String {
    handle
        .with(|entity| name_line(entity.name()))
        .unwrap_or_else(|| DELETED_MESSAGE.to_string())
}

/// Builds the zero-argument callback for the guarded read trigger.
pub fn guarded_reader(handle: WeakHandle, sink: Rc<dyn DiagnosticSink>) -> impl Fn() + 'static {
    move || sink.emit(&describe(&handle))
}
