//! Core data model: actions, states and transitions.
//!
//! This module contains the building blocks the machine stores in its tables:
//! - [`ActionRegistry`] resolving action names to callables
//! - [`StateDescriptor`] / [`State`] for declared states
//! - [`TransitionDescriptor`] / [`Transition`] for declared transitions

mod action;
mod state;
mod transition;

pub use action::{Action, ActionRegistry};
pub(crate) use action::invoke_all;
pub use state::{State, StateDescriptor};
pub use transition::{Transition, TransitionDescriptor};

/// Origin key matching any current state. Never an occupiable state.
pub const ANY_STATE: &str = "*";

/// Conventional starting state.
pub const INIT_STATE: &str = "init";
