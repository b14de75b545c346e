//! Typed publish/subscribe registry for game events.

use std::{
    any::Any,
    fmt,
    panic::{self, AssertUnwindSafe},
};

use grid_snake_core::{Event, EventKind};
use thiserror::Error;

/// Failure reported by an event handler.
///
/// The bus logs the failure and keeps delivering to the remaining handlers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Creates a handler failure carrying the provided message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Callback invoked synchronously for every published event of its kind.
pub type Handler = Box<dyn FnMut(&Event) -> Result<(), HandlerError>>;

/// Identifier returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

struct Registration {
    id: SubscriptionId,
    handler: Handler,
}

/// Typed publish/subscribe registry keyed on the exact event variant.
///
/// Handlers for one kind run in registration order on the publishing thread.
/// Nothing is queued: `publish` returns once every handler has run.
pub struct EventBus {
    channels: [Vec<Registration>; EventKind::COUNT],
    next_id: u64,
    failures: u64,
}

impl EventBus {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: std::array::from_fn(|_| Vec::new()),
            next_id: 0,
            failures: 0,
        }
    }

    /// Registers `handler` for every event of `kind`.
    ///
    /// Registering the same logic twice yields two identifiers and two
    /// invocations per publish.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&Event) -> Result<(), HandlerError> + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.channels[kind.index()].push(Registration {
            id,
            handler: Box::new(handler),
        });
        id
    }

    /// Removes the registration `id` from `kind`.
    ///
    /// Returns `false` when no such registration exists.
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let channel = &mut self.channels[kind.index()];
        match channel.iter().position(|registration| registration.id == id) {
            Some(index) => {
                let _ = channel.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers `event` to every handler registered for its kind.
    ///
    /// A handler that returns an error or panics is logged and counted; the
    /// remaining handlers still run.
    pub fn publish(&mut self, event: &Event) {
        let kind = event.kind();
        for registration in &mut self.channels[kind.index()] {
            let handler = &mut registration.handler;
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    self.failures = self.failures.saturating_add(1);
                    log::error!(
                        "handler {} failed while handling {:?}: {}",
                        registration.id.get(),
                        kind,
                        error
                    );
                }
                Err(payload) => {
                    self.failures = self.failures.saturating_add(1);
                    log::error!(
                        "handler {} panicked while handling {:?}: {}",
                        registration.id.get(),
                        kind,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }

    /// Number of handlers registered for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.channels[kind.index()].len()
    }

    /// Number of handler failures observed since the bus was created.
    #[must_use]
    pub const fn failure_count(&self) -> u64 {
        self.failures
    }

    /// Drops every subscription.
    pub fn clear(&mut self) {
        for channel in &mut self.channels {
            channel.clear();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers: usize = self.channels.iter().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("subscribers", &subscribers)
            .field("failures", &self.failures)
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> Handler {
        let log = Rc::clone(log);
        Box::new(move |_event: &Event| {
            log.borrow_mut().push(label);
            Ok(())
        })
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let _ = bus.subscribe(EventKind::Paused, recorder(&log, "first"));
        let _ = bus.subscribe(EventKind::Paused, recorder(&log, "second"));

        bus.publish(&Event::Paused { tick: 1 });

        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn dispatch_matches_exact_kind_only() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let _ = bus.subscribe(EventKind::Resumed, recorder(&log, "resumed"));

        bus.publish(&Event::Paused { tick: 1 });
        assert!(log.borrow().is_empty());

        bus.publish(&Event::Resumed { tick: 1 });
        assert_eq!(*log.borrow(), vec!["resumed"]);
    }

    #[test]
    fn duplicate_registrations_fire_once_each() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let first = bus.subscribe(EventKind::Restarted, recorder(&log, "again"));
        let _ = bus.subscribe(EventKind::Restarted, recorder(&log, "again"));
        assert_eq!(bus.subscriber_count(EventKind::Restarted), 2);

        bus.publish(&Event::Restarted { tick: 0 });
        assert_eq!(log.borrow().len(), 2);

        assert!(bus.unsubscribe(EventKind::Restarted, first));
        assert!(!bus.unsubscribe(EventKind::Restarted, first));
        assert_eq!(bus.subscriber_count(EventKind::Restarted), 1);

        bus.publish(&Event::Restarted { tick: 0 });
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn unsubscribe_requires_matching_kind() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let id = bus.subscribe(EventKind::Tick, recorder(&log, "tick"));
        assert!(!bus.unsubscribe(EventKind::Paused, id));
        assert_eq!(bus.subscriber_count(EventKind::Tick), 1);
    }

    #[test]
    fn failing_handler_does_not_stop_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let _ = bus.subscribe(EventKind::Paused, |_event: &Event| {
            Err(HandlerError::new("renderer unavailable"))
        });
        let _ = bus.subscribe(EventKind::Paused, recorder(&log, "after"));

        bus.publish(&Event::Paused { tick: 2 });

        assert_eq!(*log.borrow(), vec!["after"]);
        assert_eq!(bus.failure_count(), 1);
    }

    #[test]
    fn panicking_handler_does_not_stop_delivery() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let _ = bus.subscribe(EventKind::Collision, |_event: &Event| -> Result<(), HandlerError> {
            panic!("overlay crashed")
        });
        let _ = bus.subscribe(EventKind::Collision, recorder(&log, "after"));

        bus.publish(&Event::Collision {
            kind: grid_snake_core::CollisionKind::Wall,
            position: grid_snake_core::CellCoord::new(-1, 0),
            tick: 3,
        });
        bus.publish(&Event::Collision {
            kind: grid_snake_core::CollisionKind::Wall,
            position: grid_snake_core::CellCoord::new(-1, 0),
            tick: 4,
        });

        assert_eq!(*log.borrow(), vec!["after", "after"]);
        assert_eq!(bus.failure_count(), 2);
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
        let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(owned.as_ref()), "owned");
        assert_eq!(panic_message(borrowed.as_ref()), "borrowed");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn clear_drops_every_subscription() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for kind in EventKind::ALL {
            let _ = bus.subscribe(kind, recorder(&log, "any"));
        }
        bus.clear();
        for kind in EventKind::ALL {
            assert_eq!(bus.subscriber_count(kind), 0);
        }
    }
}
