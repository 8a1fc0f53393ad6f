//! Transition descriptors and their resolved form.

use super::action::{Action, ActionRegistry};
use crate::error::MachineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a transition out of some origin state.
///
/// The origin state and event name are the keys under which the descriptor is
/// registered, so they are not part of the descriptor itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionDescriptor {
    /// Destination state.
    #[serde(alias = "enterState")]
    pub to: String,

    /// Actions invoked, in order, between leaving and entering.
    #[serde(default, alias = "callbacks")]
    pub actions: Vec<String>,

    /// Secondary event emitted right after the `transition` notification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<String>,

    /// Opaque metadata, passed through unmodified.
    #[serde(default)]
    pub metadata: Value,
}

impl TransitionDescriptor {
    /// Transition to `state` with no actions.
    pub fn to(state: impl Into<String>) -> Self {
        Self {
            to: state.into(),
            ..Self::default()
        }
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn triggers(mut self, event: impl Into<String>) -> Self {
        self.triggers = Some(event.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub(crate) fn resolve(&self, registry: &ActionRegistry) -> Result<Transition, MachineError> {
        Ok(Transition {
            to: self.to.clone(),
            actions: registry.resolve(&self.actions)?,
            triggers: self.triggers.clone(),
            metadata: self.metadata.clone(),
        })
    }
}

/// A registered transition with its actions bound to callables.
#[derive(Clone, Debug)]
pub struct Transition {
    pub(crate) to: String,
    pub(crate) actions: Vec<Action>,
    pub(crate) triggers: Option<String>,
    pub(crate) metadata: Value,
}

impl Transition {
    pub fn destination(&self) -> &str {
        &self.to
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn triggers(&self) -> Option<&str> {
        self.triggers.as_deref()
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}
