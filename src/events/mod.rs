//! Event plumbing between a host and its machine.
//!
//! The machine never assumes anything about its host beyond the [`Emitter`]
//! capability: bind a handler to a named event, and emit a named event with
//! arguments. [`EventBus`] is a ready-made single-threaded implementation.

mod emitter;
mod notification;

pub use emitter::{Emitter, EventBus, Handler, ALL_EVENTS};
pub use notification::{enter_state_event, leave_state_event, Notification, TRANSITION_EVENT};
