//! Declarative machine configuration.

use crate::core::{StateDescriptor, TransitionDescriptor, INIT_STATE};
use crate::error::MachineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Transitions keyed by origin state, then by event name.
pub type TransitionTable = BTreeMap<String, BTreeMap<String, TransitionDescriptor>>;

/// Declarative table a machine is populated from.
///
/// ```rust
/// use statehook::machine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{
///     "transitions": {
///         "init": { "initialized": { "to": "visible" } },
///         "visible": { "hide": { "to": "hidden", "actions": ["fadeOut"] } }
///     },
///     "states": {
///         "hidden": { "enter": ["logHidden"] }
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.initial, "init");
/// assert!(!config.silent);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Starting state.
    #[serde(default = "default_initial")]
    pub initial: String,

    /// Whether lifecycle notifications start suppressed.
    #[serde(default)]
    pub silent: bool,

    #[serde(default)]
    pub states: BTreeMap<String, StateDescriptor>,

    #[serde(default)]
    pub transitions: TransitionTable,
}

fn default_initial() -> String {
    INIT_STATE.to_string()
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            silent: false,
            states: BTreeMap::new(),
            transitions: BTreeMap::new(),
        }
    }
}

impl MachineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, MachineError> {
        serde_json::from_str(text).map_err(|e| MachineError::InvalidConfig(e.to_string()))
    }

    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.initial = state.into();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn state(mut self, name: impl Into<String>, descriptor: StateDescriptor) -> Self {
        self.states.insert(name.into(), descriptor);
        self
    }

    pub fn transition(
        mut self,
        origin: impl Into<String>,
        event: impl Into<String>,
        descriptor: TransitionDescriptor,
    ) -> Self {
        self.transitions
            .entry(origin.into())
            .or_default()
            .insert(event.into(), descriptor);
        self
    }
}
