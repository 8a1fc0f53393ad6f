//! The state machine engine.
//!
//! - [`StateMachine`] owns the state and transition tables and the current state
//! - [`MachineConfig`] is the declarative table a machine is populated from
//! - [`Dispatch`] reports whether an event matched a transition
//! - [`Diagnostic`] carries non-fatal registration findings

mod config;
mod dispatch;
mod state_machine;

pub use config::{MachineConfig, TransitionTable};
pub use state_machine::{Diagnostic, Dispatch, StateMachine};
