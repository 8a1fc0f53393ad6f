//! State descriptors and their resolved form.
//!
//! A [`StateDescriptor`] is the declarative shape a host writes (action
//! names plus opaque metadata). Declaring it on a machine resolves the names
//! against the action registry and stores a [`State`].

use super::action::{Action, ActionRegistry};
use crate::error::MachineError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a state.
///
/// # Example
///
/// ```rust
/// use statehook::core::StateDescriptor;
/// use serde_json::json;
///
/// let hidden = StateDescriptor::new()
///     .on_enter("fadeOut")
///     .on_leave("fadeIn")
///     .metadata(json!({ "className": "hiddenBehindTree" }));
///
/// assert_eq!(hidden.enter, vec!["fadeOut"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDescriptor {
    /// Actions invoked, in order, when the state is entered.
    #[serde(default)]
    pub enter: Vec<String>,

    /// Actions invoked, in order, when the state is left through a transition.
    #[serde(default)]
    pub leave: Vec<String>,

    /// Opaque metadata, passed through unmodified.
    #[serde(default)]
    pub metadata: Value,
}

impl StateDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_enter(mut self, action: impl Into<String>) -> Self {
        self.enter.push(action.into());
        self
    }

    pub fn on_leave(mut self, action: impl Into<String>) -> Self {
        self.leave.push(action.into());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Resolve action names into a [`State`].
    pub(crate) fn resolve(&self, registry: &ActionRegistry) -> Result<State, MachineError> {
        Ok(State {
            enter: registry.resolve(&self.enter)?,
            leave: registry.resolve(&self.leave)?,
            metadata: self.metadata.clone(),
        })
    }
}

/// A state with its actions bound to callables.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub(crate) enter: Vec<Action>,
    pub(crate) leave: Vec<Action>,
    pub(crate) metadata: Value,
}

impl State {
    /// A state with no actions and null metadata.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn enter_actions(&self) -> &[Action] {
        &self.enter
    }

    pub fn leave_actions(&self) -> &[Action] {
        &self.leave
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}
