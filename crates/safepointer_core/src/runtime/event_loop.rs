//! Deferred-task queue with a virtual millisecond clock.

use log::trace;
use std::cell::{Cell, RefCell};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

/// Identifier of one queued action, in scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct QueuedTask {
    deadline_ms: u64,
    id: TaskId,
    action: Box<dyn FnOnce()>,
}

impl QueuedTask {
    fn key(&self) -> (u64, TaskId) {
        (self.deadline_ms, self.id)
    }
}

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

/// Single-threaded event loop.
///
/// Actions run in deadline order; equal deadlines run in scheduling order.
/// Actions may schedule further actions through a shared reference to the
/// loop, since no internal borrow is held while an action runs.
#[derive(Default)]
pub struct EventLoop {
    now_ms: Cell<u64>,
    next_id: Cell<u64>,
    queue: RefCell<BinaryHeap<Reverse<QueuedTask>>>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    /// Number of actions waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Deadline of the next action, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue
            .borrow()
            .peek()
            .map(|Reverse(task)| task.deadline_ms)
    }

    /// Queues `action` to run once, `delay_ms` after the current time.
    pub fn call_after_delay(&self, delay_ms: u64, action: impl FnOnce() + 'static) -> TaskId {
        let id = TaskId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let deadline_ms = self.now_ms().saturating_add(delay_ms);
        self.queue.borrow_mut().push(Reverse(QueuedTask {
            deadline_ms,
            id,
            action: Box::new(action),
        }));
        trace!("event=task_scheduled module=event_loop task_id={id} deadline_ms={deadline_ms}");
        id
    }

    /// Runs every action due at or before `target_ms`, then moves the clock
    /// to `target_ms`. Returns how many actions ran.
    pub fn run_until(&self, target_ms: u64) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop_due(target_ms) {
            self.execute(task);
            ran += 1;
        }
        if target_ms > self.now_ms() {
            self.now_ms.set(target_ms);
        }
        ran
    }

    /// Advances the clock by `delta_ms`, running everything that comes due.
    pub fn advance_by(&self, delta_ms: u64) -> usize {
        self.run_until(self.now_ms().saturating_add(delta_ms))
    }

    /// Runs the next action immediately, moving the clock forward to its
    /// deadline. Returns `false` when the queue is empty.
    pub fn run_next(&self) -> bool {
        let next = self.queue.borrow_mut().pop();
        match next {
            Some(Reverse(task)) => {
                self.execute(task);
                true
            }
            None => false,
        }
    }

    /// Runs until the queue is empty. Returns how many actions ran.
    pub fn run_to_completion(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    fn pop_due(&self, target_ms: u64) -> Option<QueuedTask> {
        let mut queue = self.queue.borrow_mut();
        let due = matches!(queue.peek(), Some(Reverse(task)) if task.deadline_ms <= target_ms);
        if due {
            queue.pop().map(|Reverse(task)| task)
        } else {
            None
        }
    }

    fn execute(&self, task: QueuedTask) {
        if task.deadline_ms > self.now_ms() {
            self.now_ms.set(task.deadline_ms);
        }
        trace!(
            "event=task_run module=event_loop task_id={} now_ms={}",
            task.id,
            self.now_ms()
        );
        (task.action)();
    }
}

#[cfg(test)]
mod tests {
    use super::EventLoop;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |label: &'static str| -> Box<dyn FnOnce()> {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(label))
        };
        (log, make)
    }

    #[test]
    fn runs_in_deadline_then_fifo_order() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();

        event_loop.call_after_delay(20, make("late"));
        event_loop.call_after_delay(10, make("first"));
        event_loop.call_after_delay(10, make("second"));

        assert_eq!(event_loop.run_to_completion(), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(event_loop.now_ms(), 20);
    }

    #[test]
    fn never_runs_before_deadline() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();
        event_loop.call_after_delay(100, make("due"));

        assert_eq!(event_loop.run_until(99), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(event_loop.now_ms(), 99);

        assert_eq!(event_loop.advance_by(1), 1);
        assert_eq!(*log.borrow(), vec!["due"]);
        assert_eq!(event_loop.pending(), 0);
    }

    #[test]
    fn actions_can_schedule_more_actions() {
        let event_loop = Rc::new(EventLoop::new());
        let (log, make) = recorder();
        let inner = make("inner");

        let handle = Rc::clone(&event_loop);
        event_loop.call_after_delay(5, move || {
            handle.call_after_delay(5, inner);
        });

        assert_eq!(event_loop.run_until(10), 2);
        assert_eq!(*log.borrow(), vec!["inner"]);
    }

    #[test]
    fn run_next_forces_the_earliest_action() {
        let event_loop = EventLoop::new();
        let (log, make) = recorder();
        event_loop.call_after_delay(2_500, make("forced"));

        assert_eq!(event_loop.next_deadline(), Some(2_500));
        assert!(event_loop.run_next());
        assert_eq!(*log.borrow(), vec!["forced"]);
        assert_eq!(event_loop.now_ms(), 2_500);
        assert!(!event_loop.run_next());
    }

    #[test]
    fn deadline_saturates_instead_of_overflowing() {
        let event_loop = EventLoop::new();
        event_loop.advance_by(10);
        event_loop.call_after_delay(u64::MAX, || {});
        assert_eq!(event_loop.next_deadline(), Some(u64::MAX));
    }
}
