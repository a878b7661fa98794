//! Write-only diagnostic sinks.
//!
//! # Responsibility
//! - Receive the human-readable lines produced by UI callbacks.
//!
//! # Invariants
//! - Emitting never fails and never panics.

use log::info;
use std::cell::RefCell;
use std::rc::Rc;

/// Destination for human-readable diagnostic lines.
pub trait DiagnosticSink {
    fn emit(&self, line: &str);
}

/// Forwards every line to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, line: &str) {
        info!("event=diagnostic module=sink line={line}");
    }
}

/// Prints every line to stdout and mirrors it into the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&self, line: &str) {
        println!("{line}");
        LogSink.emit(line);
    }
}

/// Captures lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.lines.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}
