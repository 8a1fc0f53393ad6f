//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{ActionRegistry, StateDescriptor, TransitionDescriptor};
use crate::events::Emitter;
use crate::machine::{MachineConfig, StateMachine};
use serde_json::Value;
use std::rc::Rc;

/// Builder for constructing state machines with a fluent API.
///
/// `build` creates the machine in its starting state, registers every state
/// and then every transition, and attaches the machine to the emitter.
pub struct StateMachineBuilder {
    emitter: Option<Rc<dyn Emitter>>,
    actions: ActionRegistry,
    config: MachineConfig,
}

impl StateMachineBuilder {
    pub fn new() -> Self {
        Self {
            emitter: None,
            actions: ActionRegistry::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the event channel the machine listens and announces on (required).
    pub fn emitter(mut self, emitter: Rc<dyn Emitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Replace the action registry.
    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = actions;
        self
    }

    /// Register a single action.
    pub fn action<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        self.actions.insert(name, callback);
        self
    }

    /// Start from a declarative configuration, replacing anything declared
    /// so far.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the starting state (defaults to `init`).
    pub fn initial(mut self, state: impl Into<String>) -> Self {
        self.config.initial = state.into();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.config.silent = silent;
        self
    }

    pub fn state(mut self, name: impl Into<String>, descriptor: StateDescriptor) -> Self {
        self.config.states.insert(name.into(), descriptor);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        let keyed = builder.build()?;
        Ok(self.add_transition(keyed.origin, keyed.event, keyed.descriptor))
    }

    /// Add a transition keyed by origin state and event.
    pub fn add_transition(
        mut self,
        origin: impl Into<String>,
        event: impl Into<String>,
        descriptor: TransitionDescriptor,
    ) -> Self {
        self.config = self.config.transition(origin, event, descriptor);
        self
    }

    /// Build and attach the machine.
    pub fn build(self) -> Result<Rc<StateMachine>, BuildError> {
        let emitter = self.emitter.ok_or(BuildError::MissingEmitter)?;

        let initial = self.config.initial.clone();
        let machine = StateMachine::with_initial(emitter, self.actions, initial)?;
        machine.configure(&self.config)?;

        let machine = Rc::new(machine);
        machine.attach();
        Ok(machine)
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
