//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and the [`actions!`](crate::actions)
//! macro for assembling a machine without hand-written declaration calls.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::{KeyedTransition, TransitionBuilder};

use crate::core::TransitionDescriptor;

/// Create a transition that only moves to `to`, with no actions.
///
/// # Example
///
/// ```
/// use statehook::builder::simple_transition;
///
/// let keyed = simple_transition("init", "initialized", "visible");
/// assert_eq!(keyed.descriptor.to, "visible");
/// ```
pub fn simple_transition(
    from: impl Into<String>,
    event: impl Into<String>,
    to: impl Into<String>,
) -> KeyedTransition {
    KeyedTransition {
        origin: from.into(),
        event: event.into(),
        descriptor: TransitionDescriptor::to(to),
    }
}
