//! Build errors for machine and transition builders.

use crate::error::MachineError;
use thiserror::Error;

/// Errors that can occur when building machines and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Emitter not specified. Call .emitter(emitter) before .build()")]
    MissingEmitter,

    #[error("Transition origin state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error(transparent)]
    Machine(#[from] MachineError),
}
