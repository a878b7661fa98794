//! Single-owner entity store.

use crate::handle::weak::WeakHandle;
use crate::model::entity::{Entity, EntityId, EntitySnapshot};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Shared cell type the store owns entities through.
pub(crate) type EntityCell = Rc<RefCell<Entity>>;

/// Result of a destroy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    /// The entity was alive and has now been dropped.
    Destroyed,
    /// Nothing to do; some other path destroyed it first (or it never existed).
    AlreadyGone,
    /// A scoped access is reading or updating the entity right now, so it
    /// stays owned by the store and alive.
    InUse,
}

impl Display for DestroyOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Destroyed => write!(f, "destroyed"),
            Self::AlreadyGone => write!(f, "already_gone"),
            Self::InUse => write!(f, "in_use"),
        }
    }
}

/// Owner of every entity created through it.
///
/// Dropping the store drops all remaining entities, which invalidates every
/// handle pointing at them.
#[derive(Debug, Default)]
pub struct EntityStore {
    entries: RefCell<BTreeMap<EntityId, EntityCell>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `entity` and returns a weak observation handle.
    pub fn insert(&self, entity: Entity) -> WeakHandle {
        let id = entity.id();
        let cell = Rc::new(RefCell::new(entity));
        let handle = WeakHandle::observe(id, &cell);
        self.entries.borrow_mut().insert(id, cell);
        debug!("event=entity_inserted module=store status=ok entity_id={id}");
        handle
    }

    /// Creates and inserts a new entity named `name`.
    pub fn create(&self, name: impl Into<String>) -> WeakHandle {
        self.insert(Entity::new(name))
    }

    /// Destroys the entity with `id` if it is still owned by this store.
    ///
    /// On `Destroyed` the entity is dropped before this returns, so every
    /// `WeakHandle` for it already reports invalid when the caller observes
    /// the outcome. Called from inside `WeakHandle::with`/`update` on the
    /// same entity, the access still holds it; the entity stays in the store
    /// and the call reports `InUse`.
    pub fn destroy(&self, id: EntityId) -> DestroyOutcome {
        // Release the map borrow before the entity's drop runs.
        let removed = self.entries.borrow_mut().remove(&id);
        let outcome = match removed.map(Rc::try_unwrap) {
            Some(Ok(entity)) => {
                drop(entity);
                DestroyOutcome::Destroyed
            }
            Some(Err(cell)) => {
                self.entries.borrow_mut().insert(id, cell);
                DestroyOutcome::InUse
            }
            None => DestroyOutcome::AlreadyGone,
        };
        if outcome == DestroyOutcome::InUse {
            warn!("event=entity_destroy module=store status=deferred entity_id={id} outcome={outcome}");
        } else {
            info!("event=entity_destroy module=store status=ok entity_id={id} outcome={outcome}");
        }
        outcome
    }

    /// Returns a fresh weak handle for `id`, or `None` when it is gone.
    pub fn handle(&self, id: EntityId) -> Option<WeakHandle> {
        self.entries
            .borrow()
            .get(&id)
            .map(|cell| WeakHandle::observe(id, cell))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns snapshots of all live entities, sorted by id.
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entries
            .borrow()
            .values()
            .map(|cell| cell.borrow().snapshot())
            .collect()
    }

    /// Destroys every remaining entity and returns how many were dropped.
    ///
    /// This is teardown: an entity under a scoped access is released here
    /// and dropped when that access returns.
    pub fn clear(&self) -> usize {
        let drained = std::mem::take(&mut *self.entries.borrow_mut());
        let count = drained.len();
        drop(drained);
        count
    }

    #[cfg(feature = "hazard-demo")]
    pub(crate) fn cell_ptr(&self, id: EntityId) -> Option<*const RefCell<Entity>> {
        self.entries.borrow().get(&id).map(Rc::as_ptr)
    }
}

#[cfg(test)]
mod tests {
    use super::{DestroyOutcome, EntityStore};

    #[test]
    fn destroy_is_at_most_once() {
        let store = EntityStore::new();
        let handle = store.create("once");

        assert!(store.contains(handle.id()));
        assert_eq!(store.destroy(handle.id()), DestroyOutcome::Destroyed);
        assert!(!store.contains(handle.id()));
        assert_eq!(store.destroy(handle.id()), DestroyOutcome::AlreadyGone);
        assert!(store.is_empty());
    }

    #[test]
    fn handle_lookup_follows_ownership() {
        let store = EntityStore::new();
        let handle = store.create("lookup");

        let fresh = store.handle(handle.id()).expect("entity should be owned");
        assert_eq!(fresh.id(), handle.id());

        store.destroy(handle.id());
        assert!(store.handle(handle.id()).is_none());
        assert!(!fresh.is_alive());
    }

    #[test]
    fn destroy_inside_an_access_keeps_the_entity() {
        let store = EntityStore::new();
        let handle = store.create("busy");

        let during = handle.with(|_| (store.destroy(handle.id()), handle.is_alive()));
        assert_eq!(during, Some((DestroyOutcome::InUse, true)));
        assert!(store.contains(handle.id()));
        assert_eq!(handle.name().as_deref(), Some("busy"));

        let renamed = handle.update(|entity| {
            entity.set_name("still busy");
            store.destroy(handle.id())
        });
        assert_eq!(renamed, Some(DestroyOutcome::InUse));

        assert_eq!(store.destroy(handle.id()), DestroyOutcome::Destroyed);
        assert!(!handle.is_alive());
        assert!(!store.contains(handle.id()));
    }

    #[test]
    fn destroyed_outcome_is_never_observed_alive() {
        let store = EntityStore::new();
        let handle = store.create("observed");
        let other = store.handle(handle.id()).expect("entity should be owned");

        let outcome = store.destroy(handle.id());
        assert_eq!(outcome, DestroyOutcome::Destroyed);
        assert!(!handle.is_alive());
        assert!(other.with(|_| ()).is_none());
    }

    #[test]
    fn clear_drops_everything() {
        let store = EntityStore::new();
        let first = store.create("a");
        let second = store.create("b");

        assert_eq!(store.clear(), 2);
        assert!(!first.is_alive());
        assert!(!second.is_alive());
    }
}
