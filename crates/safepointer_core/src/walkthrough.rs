//! Small standalone lifetime walkthroughs.

use crate::diagnostics::DiagnosticSink;
use crate::handle::weak::WeakHandle;
use crate::model::entity::Entity;
use crate::store::entity_store::EntityStore;

/// Reads an entity through a weak handle inside and after its owner's scope.
///
/// Returns whether the read after the scope reached the sink, which it
/// never does.
pub fn scoped_weak_reference(sink: &dyn DiagnosticSink) -> bool {
    let weak: WeakHandle;
    {
        let store = EntityStore::new();
        weak = store.create("scoped");

        if let Some(name) = weak.name() {
            sink.emit(&format!("Hello from {name}"));
        }
        // `store` drops here and takes the entity with it.
    }

    weak.with(|_| sink.emit("This will not be printed")).is_some()
}

/// Leaks one entity on purpose so the leak detector has something to report.
pub fn leaking_entity() -> &'static Entity {
    Box::leak(Box::new(Entity::new("leaked")))
}
