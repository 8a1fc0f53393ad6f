//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::TransitionDescriptor;
use serde_json::Value;

/// A transition together with the keys it is registered under.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyedTransition {
    pub origin: String,
    pub event: String,
    pub descriptor: TransitionDescriptor,
}

/// Builder for constructing transitions with a fluent API.
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    from: Option<String>,
    event: Option<String>,
    to: Option<String>,
    actions: Vec<String>,
    triggers: Option<String>,
    metadata: Value,
}

impl TransitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the origin state (required). Use [`ANY_STATE`](crate::core::ANY_STATE)
    /// for a transition that applies from every state.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.from = Some(state.into());
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Set the destination state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.to = Some(state.into());
        self
    }

    /// Append a named transition action.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.actions.push(name.into());
        self
    }

    /// Emit `event` after the `transition` notification.
    pub fn triggers(mut self, event: impl Into<String>) -> Self {
        self.triggers = Some(event.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<KeyedTransition, BuildError> {
        let origin = self.from.ok_or(BuildError::MissingFromState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(KeyedTransition {
            origin,
            event,
            descriptor: TransitionDescriptor {
                to,
                actions: self.actions,
                triggers: self.triggers,
                metadata: self.metadata,
            },
        })
    }
}
