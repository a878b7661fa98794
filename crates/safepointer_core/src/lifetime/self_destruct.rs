//! Delayed self-destruction.
//!
//! # Invariants
//! - Exactly one deferred action is queued per spawned entity.
//! - The action destroys the entity only if its weak handle is still valid
//!   and no scoped access holds it; otherwise it does nothing.
//! - The action runs on the event loop's thread at or after its deadline.

use crate::diagnostics::DiagnosticSink;
use crate::handle::weak::WeakHandle;
use crate::runtime::delay::DelaySource;
use crate::runtime::event_loop::{EventLoop, TaskId};
use crate::store::entity_store::{DestroyOutcome, EntityStore};
use log::{debug, info, warn};
use std::rc::Rc;

/// Line reported when the deferred action deletes the entity.
pub const SELF_DESTRUCT_MESSAGE: &str = "Deleted object";

/// Record of one scheduled self-destruction.
#[derive(Debug, Clone)]
pub struct SelfDestructTicket {
    pub handle: WeakHandle,
    pub task_id: TaskId,
    pub delay_ms: u64,
    pub deadline_ms: u64,
}

/// Creates an entity in `store` that deletes itself after a delay drawn
/// from `delays`.
pub fn spawn_self_destructing(
    store: &Rc<EntityStore>,
    event_loop: &EventLoop,
    delays: &mut dyn DelaySource,
    sink: Rc<dyn DiagnosticSink>,
    name: impl Into<String>,
) -> SelfDestructTicket {
    let handle = store.create(name);
    let delay_ms = delays.next_delay_ms();

    let guard = handle.clone();
    let owner = Rc::downgrade(store);
    let task_id = event_loop.call_after_delay(delay_ms, move || {
        let outcome = match owner.upgrade() {
            Some(store) if guard.is_alive() => store.destroy(guard.id()),
            _ => DestroyOutcome::AlreadyGone,
        };
        match outcome {
            DestroyOutcome::Destroyed => sink.emit(SELF_DESTRUCT_MESSAGE),
            DestroyOutcome::AlreadyGone => debug!(
                "event=self_destruct_skipped module=lifetime entity_id={}",
                guard.id()
            ),
            DestroyOutcome::InUse => warn!(
                "event=self_destruct_skipped module=lifetime status=in_use entity_id={}",
                guard.id()
            ),
        }
    });

    let deadline_ms = event_loop.now_ms().saturating_add(delay_ms);
    info!(
        "event=self_destruct_scheduled module=lifetime status=ok entity_id={} delay_ms={} deadline_ms={}",
        handle.id(),
        delay_ms,
        deadline_ms
    );

    SelfDestructTicket {
        handle,
        task_id,
        delay_ms,
        deadline_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::{spawn_self_destructing, SELF_DESTRUCT_MESSAGE};
    use crate::diagnostics::MemorySink;
    use crate::runtime::delay::FixedDelay;
    use crate::runtime::event_loop::EventLoop;
    use crate::store::entity_store::{DestroyOutcome, EntityStore};
    use std::rc::Rc;

    #[test]
    fn deletes_itself_at_the_deadline() {
        let store = Rc::new(EntityStore::new());
        let event_loop = EventLoop::new();
        let sink = MemorySink::new();

        let ticket = spawn_self_destructing(
            &store,
            &event_loop,
            &mut FixedDelay(1_200),
            Rc::new(sink.clone()),
            "timed",
        );
        assert_eq!(ticket.deadline_ms, 1_200);
        assert_eq!(event_loop.pending(), 1);

        event_loop.run_until(1_199);
        assert!(ticket.handle.is_alive());

        event_loop.run_until(1_200);
        assert!(!ticket.handle.is_alive());
        assert_eq!(sink.lines(), vec![SELF_DESTRUCT_MESSAGE]);
    }

    #[test]
    fn skips_when_already_destroyed_elsewhere() {
        let store = Rc::new(EntityStore::new());
        let event_loop = EventLoop::new();
        let sink = MemorySink::new();

        let ticket = spawn_self_destructing(
            &store,
            &event_loop,
            &mut FixedDelay(10),
            Rc::new(sink.clone()),
            "contested",
        );
        assert_eq!(store.destroy(ticket.handle.id()), DestroyOutcome::Destroyed);

        assert_eq!(event_loop.run_to_completion(), 1);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn skips_when_the_deadline_fires_during_an_access() {
        let store = Rc::new(EntityStore::new());
        let event_loop = EventLoop::new();
        let sink = MemorySink::new();

        let ticket = spawn_self_destructing(
            &store,
            &event_loop,
            &mut FixedDelay(10),
            Rc::new(sink.clone()),
            "held",
        );
        let alive_after_run = ticket.handle.with(|_| {
            event_loop.run_until(10);
            ticket.handle.is_alive()
        });

        assert_eq!(alive_after_run, Some(true));
        assert!(sink.lines().is_empty());
        assert!(store.contains(ticket.handle.id()));
        assert_eq!(store.destroy(ticket.handle.id()), DestroyOutcome::Destroyed);
    }

    #[test]
    fn skips_when_the_store_is_gone() {
        let store = Rc::new(EntityStore::new());
        let event_loop = EventLoop::new();
        let sink = MemorySink::new();

        let ticket = spawn_self_destructing(
            &store,
            &event_loop,
            &mut FixedDelay(10),
            Rc::new(sink.clone()),
            "orphaned",
        );
        drop(store);
        assert!(!ticket.handle.is_alive());

        event_loop.run_to_completion();
        assert!(sink.lines().is_empty());
    }
}
