//! Weak observation handle.
//!
//! # Responsibility
//! - Relate an observer to an entity without owning it.
//! - Answer "is it still alive" and read it only when it is.
//!
//! # Invariants
//! - Validity is the owner's strong count being non-zero; it flips when
//!   the store drops the entity, before any other code can run.
//! - Strong references produced during access never escape the closure.
//! - An entity under access cannot be destroyed; the store refuses with
//!   `InUse` rather than reporting a destruction that has not happened.

use crate::model::entity::{Entity, EntityId, EntitySnapshot};
use crate::store::entity_store::EntityCell;
use std::cell::RefCell;
use std::rc::Weak;

/// Non-owning reference that detects its target's destruction.
#[derive(Debug, Clone)]
pub struct WeakHandle {
    id: EntityId,
    target: Weak<RefCell<Entity>>,
}

impl WeakHandle {
    pub(crate) fn observe(id: EntityId, cell: &EntityCell) -> Self {
        Self {
            id,
            target: std::rc::Rc::downgrade(cell),
        }
    }

    /// A handle that never pointed at anything.
    pub fn dangling(id: EntityId) -> Self {
        Self {
            id,
            target: Weak::new(),
        }
    }

    /// Id of the observed entity; stays readable after destruction.
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    /// Runs `f` with the entity when it is alive.
    ///
    /// The entity outlives `f`: a `destroy` of it issued from inside `f`
    /// reports `DestroyOutcome::InUse` and leaves it in place.
    ///
    /// # Panics
    /// Panics if the entity is mutably borrowed by an enclosing `update`.
    pub fn with<R>(&self, f: impl FnOnce(&Entity) -> R) -> Option<R> {
        let cell = self.target.upgrade()?;
        let entity = cell.borrow();
        Some(f(&entity))
    }

    /// Runs `f` with mutable access to the entity when it is alive.
    ///
    /// # Panics
    /// Panics if the entity is already borrowed by an enclosing `with`.
    pub fn update<R>(&self, f: impl FnOnce(&mut Entity) -> R) -> Option<R> {
        let cell = self.target.upgrade()?;
        let mut entity = cell.borrow_mut();
        Some(f(&mut entity))
    }

    pub fn name(&self) -> Option<String> {
        self.with(|entity| entity.name().to_string())
    }

    pub fn snapshot(&self) -> Option<EntitySnapshot> {
        self.with(Entity::snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::WeakHandle;
    use crate::store::entity_store::EntityStore;
    use uuid::Uuid;

    #[test]
    fn reads_while_alive_and_refuses_after_destroy() {
        let store = EntityStore::new();
        let handle = store.create("watched");

        assert!(handle.is_alive());
        assert_eq!(handle.name().as_deref(), Some("watched"));

        store.destroy(handle.id());
        assert!(!handle.is_alive());
        assert_eq!(handle.name(), None);
        assert_eq!(handle.with(|_| ()), None);
    }

    #[test]
    fn update_is_visible_through_other_handles() {
        let store = EntityStore::new();
        let first = store.create("before");
        let second = first.clone();

        first
            .update(|entity| entity.set_name("after"))
            .expect("entity should be alive");
        assert_eq!(second.name().as_deref(), Some("after"));
    }

    #[test]
    fn dangling_handle_is_never_alive() {
        let handle = WeakHandle::dangling(Uuid::nil());
        assert!(!handle.is_alive());
        assert!(handle.snapshot().is_none());
    }
}
