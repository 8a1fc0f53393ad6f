//! Errors raised by machine registration and forced transitions.

use thiserror::Error;

/// Errors that can occur when registering states and transitions or when
/// forcing the machine into a state.
///
/// Every variant is raised synchronously by the call that caused it. A failed
/// call leaves previously registered states and transitions untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State name \"{0}\" is reserved and cannot be declared")]
    InvalidStateName(String),

    #[error("Action \"{name}\" does not exist in the action registry")]
    UnknownAction { name: String },

    #[error("Unknown state \"{name}\"")]
    UnknownState { name: String },

    #[error("Invalid machine configuration: {0}")]
    InvalidConfig(String),
}
