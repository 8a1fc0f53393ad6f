//! Publish/subscribe capability the machine is driven by.

use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Channel whose handlers receive every emitted event.
pub const ALL_EVENTS: &str = "all";

/// Event handler. Receives the event name followed by its arguments.
pub type Handler = Rc<dyn Fn(&str, &[Value])>;

/// The two operations a host must provide so a machine can hear events and
/// announce its own lifecycle notifications.
///
/// Implementations must tolerate re-entrant calls: a handler invoked by
/// `emit` may itself call `emit` or `bind` on the same emitter.
pub trait Emitter {
    /// Subscribe `handler` to `event`, or to every event when `event` is
    /// [`ALL_EVENTS`].
    fn bind(&self, event: &str, handler: Handler);

    /// Deliver `event` with `args` to its subscribers.
    fn emit(&self, event: &str, args: &[Value]);
}

/// In-process synchronous event bus.
///
/// Handlers run inline, in the order they were bound. A handler bound to a
/// specific event and to [`ALL_EVENTS`] sees that event twice.
#[derive(Default)]
pub struct EventBus {
    handlers: RefCell<Vec<(String, Handler)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for sharing the bus with a machine.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Remove every handler bound to `event`.
    pub fn unbind(&self, event: &str) {
        self.handlers.borrow_mut().retain(|(name, _)| name != event);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl Emitter for EventBus {
    fn bind(&self, event: &str, handler: Handler) {
        self.handlers.borrow_mut().push((event.to_string(), handler));
    }

    fn emit(&self, event: &str, args: &[Value]) {
        // Snapshot so handlers can bind or emit while we iterate.
        let matching: Vec<Handler> = self
            .handlers
            .borrow()
            .iter()
            .filter(|(name, _)| name == event || name == ALL_EVENTS)
            .map(|(_, handler)| Rc::clone(handler))
            .collect();

        for handler in matching {
            handler(event, args);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .handlers
            .borrow()
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        f.debug_struct("EventBus").field("bindings", &names).finish()
    }
}
