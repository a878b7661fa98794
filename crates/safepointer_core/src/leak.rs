//! Live-instance leak detector.
//!
//! # Responsibility
//! - Count live instances per type label on the current thread.
//! - Report labels whose instances outlived the point of the check.
//!
//! # Invariants
//! - Counters are per thread; the crate's object graph is single-threaded.
//! - A `LeakGuard` decrements exactly the counter it incremented.

use log::warn;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;

thread_local! {
    static LIVE_INSTANCES: RefCell<BTreeMap<&'static str, usize>> =
        const { RefCell::new(BTreeMap::new()) };
}

/// RAII registration of one live instance.
///
/// Embed as a private field; the instance is counted until it is dropped.
#[derive(Debug)]
pub struct LeakGuard {
    label: &'static str,
}

impl LeakGuard {
    pub fn new(label: &'static str) -> Self {
        LIVE_INSTANCES.with(|counts| {
            *counts.borrow_mut().entry(label).or_insert(0) += 1;
        });
        Self { label }
    }
}

impl Drop for LeakGuard {
    fn drop(&mut self) {
        // Thread-local may already be torn down during thread exit.
        let _ = LIVE_INSTANCES.try_with(|counts| {
            let mut counts = counts.borrow_mut();
            if let Some(count) = counts.get_mut(self.label) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    counts.remove(self.label);
                }
            }
        });
    }
}

/// One leaked type and how many of its instances are still alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeakEntry {
    pub label: &'static str,
    pub live: usize,
}

/// Returns the number of live instances registered under `label`.
pub fn live_count(label: &str) -> usize {
    LIVE_INSTANCES.with(|counts| counts.borrow().get(label).copied().unwrap_or(0))
}

/// Returns every label with live instances, sorted by label.
pub fn leak_report() -> Vec<LeakEntry> {
    LIVE_INSTANCES.with(|counts| {
        counts
            .borrow()
            .iter()
            .filter(|(_, live)| **live > 0)
            .map(|(label, live)| LeakEntry {
                label: *label,
                live: *live,
            })
            .collect()
    })
}

/// Logs one warning per leaked label and returns the report.
pub fn check_for_leaks() -> Vec<LeakEntry> {
    let report = leak_report();
    for entry in &report {
        warn!(
            "event=leak_detected module=leak status=warn type={} live={}",
            entry.label, entry.live
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{leak_report, live_count, LeakGuard};

    #[test]
    fn guards_increment_and_decrement_their_label() {
        let first = LeakGuard::new("leak_test_widget");
        let second = LeakGuard::new("leak_test_widget");
        assert_eq!(live_count("leak_test_widget"), 2);

        drop(first);
        assert_eq!(live_count("leak_test_widget"), 1);
        drop(second);
        assert_eq!(live_count("leak_test_widget"), 0);
    }

    #[test]
    fn report_lists_only_live_labels() {
        let guard = LeakGuard::new("leak_test_report");
        let report = leak_report();
        assert!(report
            .iter()
            .any(|entry| entry.label == "leak_test_report" && entry.live == 1));

        drop(guard);
        assert!(leak_report()
            .iter()
            .all(|entry| entry.label != "leak_test_report"));
    }
}
