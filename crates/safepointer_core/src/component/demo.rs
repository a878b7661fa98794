//! Demo component wiring the self-destructing entity to its triggers.

use crate::component::trigger::Trigger;
use crate::config::DemoConfig;
use crate::diagnostics::DiagnosticSink;
use crate::handle::weak::WeakHandle;
use crate::lifetime::access::guarded_reader;
use crate::lifetime::self_destruct::{spawn_self_destructing, SelfDestructTicket};
use crate::runtime::delay::DelaySource;
use crate::runtime::event_loop::EventLoop;
use crate::store::entity_store::EntityStore;
use log::{debug, info};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

type Callback = Box<dyn Fn()>;

/// Component trigger errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
    DuplicateSubscription(Trigger),
    NoSubscription(Trigger),
}

impl Display for ComponentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSubscription(trigger) => {
                write!(f, "trigger already subscribed: {trigger}")
            }
            Self::NoSubscription(trigger) => write!(f, "no subscription for trigger: {trigger}"),
        }
    }
}

impl Error for ComponentError {}

pub type ComponentResult<T> = Result<T, ComponentError>;

/// Headless stand-in for the UI component with `check`, `crash` and
/// `delete object` buttons.
pub struct DemoComponent {
    subscriptions: BTreeMap<Trigger, Callback>,
    ticket: SelfDestructTicket,
}

impl DemoComponent {
    /// Spawns the tracked entity and subscribes the default triggers.
    pub fn new(
        store: &Rc<EntityStore>,
        event_loop: &EventLoop,
        delays: &mut dyn DelaySource,
        sink: Rc<dyn DiagnosticSink>,
        config: &DemoConfig,
    ) -> Self {
        let ticket = spawn_self_destructing(
            store,
            event_loop,
            delays,
            Rc::clone(&sink),
            config.entity_name.as_str(),
        );
        let mut component = Self {
            subscriptions: BTreeMap::new(),
            ticket,
        };
        let tracked = component.ticket.handle.clone();

        component.subscriptions.insert(
            Trigger::Check,
            Box::new(guarded_reader(tracked.clone(), Rc::clone(&sink))),
        );

        let owner = Rc::downgrade(store);
        let target = tracked.clone();
        component.subscriptions.insert(
            Trigger::DeleteObject,
            Box::new(move || {
                if let Some(store) = owner.upgrade() {
                    store.destroy(target.id());
                }
            }),
        );

        #[cfg(feature = "hazard-demo")]
        if let Some(raw) = crate::handle::raw::RawHandle::capture(store, tracked.id()) {
            component.subscriptions.insert(
                Trigger::Crash,
                Box::new(crate::lifetime::hazard::unguarded_reader(raw, sink)),
            );
        }

        info!(
            "event=component_ready module=component status=ok entity_id={} triggers={}",
            tracked.id(),
            component.subscriptions.len()
        );
        component
    }

    /// Adds a subscription for `trigger`.
    pub fn subscribe(
        &mut self,
        trigger: Trigger,
        callback: impl Fn() + 'static,
    ) -> ComponentResult<()> {
        if self.subscriptions.contains_key(&trigger) {
            return Err(ComponentError::DuplicateSubscription(trigger));
        }
        self.subscriptions.insert(trigger, Box::new(callback));
        Ok(())
    }

    /// Removes the subscription for `trigger`, returning whether one existed.
    pub fn unsubscribe(&mut self, trigger: Trigger) -> bool {
        self.subscriptions.remove(&trigger).is_some()
    }

    /// Delivers one press of `trigger`.
    pub fn click(&self, trigger: Trigger) -> ComponentResult<()> {
        let callback = self
            .subscriptions
            .get(&trigger)
            .ok_or(ComponentError::NoSubscription(trigger))?;
        debug!("event=trigger_pressed module=component trigger={trigger}");
        callback();
        Ok(())
    }

    pub fn is_subscribed(&self, trigger: Trigger) -> bool {
        self.subscriptions.contains_key(&trigger)
    }

    /// Subscribed triggers in declaration order.
    pub fn triggers(&self) -> Vec<Trigger> {
        self.subscriptions.keys().copied().collect()
    }

    /// Weak handle to the tracked entity.
    pub fn tracked(&self) -> &WeakHandle {
        &self.ticket.handle
    }

    pub fn ticket(&self) -> &SelfDestructTicket {
        &self.ticket
    }
}
