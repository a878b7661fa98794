//! Unguarded entity access, kept only to show the failure mode.
//!
//! The callback built here dereferences a captured address with no liveness
//! check. Invoking it after the entity is destroyed is undefined behavior.

use crate::diagnostics::DiagnosticSink;
use crate::handle::raw::RawHandle;
use crate::lifetime::access::{name_line, DELETED_MESSAGE};
use std::rc::Rc;

/// Builds the zero-argument callback for the crash trigger.
pub fn unguarded_reader(raw: RawHandle, sink: Rc<dyn DiagnosticSink>) -> impl Fn() + 'static {
    move || {
        if raw.is_null() {
            sink.emit(DELETED_MESSAGE);
            return;
        }
        // SAFETY: none. A null check says nothing about a freed target; this
        // is only sound while the entity is alive.
        let name = unsafe { raw.name() };
        sink.emit(&name_line(&name));
    }
}
