//! The machine instance: tables, current state and registration.

use super::config::MachineConfig;
use crate::core::{ActionRegistry, State, StateDescriptor, Transition, TransitionDescriptor};
use crate::core::{ANY_STATE, INIT_STATE};
use crate::error::MachineError;
use crate::events::{Emitter, ALL_EVENTS};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Non-fatal findings from bulk registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// No transition leaves the starting state and no wildcard transition
    /// exists, so no event can ever move the machine.
    NoExitFromInitial { state: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoExitFromInitial { state } => {
                write!(f, "there is no transition from state \"{state}\" to another state")
            }
        }
    }
}

/// Outcome of dispatching an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A transition matched and ran to completion.
    Handled,
    /// No transition matched; nothing ran and nothing was emitted.
    Unhandled,
}

impl Dispatch {
    /// Whether a transition ran.
    pub fn is_handled(self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// A finite state machine driven by named events.
///
/// The machine owns its state and transition tables and talks to its host
/// only through an injected [`Emitter`]. All methods take `&self`: actions
/// may re-enter the machine (dispatching, forcing a state, reading the
/// current state) while a transition is in flight, so tables are never kept
/// borrowed across an action call or an emit.
///
/// Single-threaded by construction. Registration is expected to finish
/// before the first dispatch.
pub struct StateMachine {
    pub(super) id: Uuid,
    pub(super) emitter: Rc<dyn Emitter>,
    pub(super) actions: ActionRegistry,
    pub(super) initial: String,
    pub(super) current: RefCell<String>,
    pub(super) silent: Cell<bool>,
    pub(super) states: RefCell<HashMap<String, State>>,
    pub(super) transitions: RefCell<HashMap<String, HashMap<String, Transition>>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
    attached: Cell<bool>,
}

impl StateMachine {
    /// Create a machine starting in [`INIT_STATE`].
    pub fn new(emitter: Rc<dyn Emitter>, actions: ActionRegistry) -> Self {
        Self::build(emitter, actions, INIT_STATE.to_string())
    }

    /// Create a machine starting in `initial`.
    ///
    /// The starting state is declared as an empty state so the current state
    /// always resolves; a later `declare_state` may give it actions.
    pub fn with_initial(
        emitter: Rc<dyn Emitter>,
        actions: ActionRegistry,
        initial: impl Into<String>,
    ) -> Result<Self, MachineError> {
        let initial = initial.into();
        if initial == ANY_STATE {
            return Err(MachineError::InvalidStateName(initial));
        }
        Ok(Self::build(emitter, actions, initial))
    }

    fn build(emitter: Rc<dyn Emitter>, actions: ActionRegistry, initial: String) -> Self {
        let mut states = HashMap::new();
        states.insert(initial.clone(), State::empty());
        Self {
            id: Uuid::new_v4(),
            emitter,
            actions,
            current: RefCell::new(initial.clone()),
            initial,
            silent: Cell::new(false),
            states: RefCell::new(states),
            transitions: RefCell::new(HashMap::new()),
            diagnostics: RefCell::new(Vec::new()),
            attached: Cell::new(false),
        }
    }

    /// Bind the machine to its emitter so every emitted event is dispatched.
    ///
    /// The handler holds a weak reference; once the machine is dropped the
    /// binding becomes inert. Attaching twice is a no-op.
    pub fn attach(self: &Rc<Self>) {
        if self.attached.replace(true) {
            return;
        }
        let machine = Rc::downgrade(self);
        self.emitter.bind(
            ALL_EVENTS,
            Rc::new(move |event: &str, args: &[Value]| {
                if let Some(machine) = machine.upgrade() {
                    machine.dispatch(event, args);
                }
            }),
        );
        debug!(machine = %self.id, "attached to emitter");
    }

    /// Register or overwrite a state.
    pub fn declare_state(
        &self,
        name: &str,
        descriptor: &StateDescriptor,
    ) -> Result<(), MachineError> {
        if name == ANY_STATE {
            return Err(MachineError::InvalidStateName(name.to_string()));
        }
        let state = descriptor.resolve(&self.actions)?;
        self.states.borrow_mut().insert(name.to_string(), state);
        Ok(())
    }

    /// Register or overwrite the transition keyed by `(origin, event)`.
    ///
    /// Unknown origin and destination states are created empty. `origin` may
    /// be [`ANY_STATE`]; the destination may not.
    pub fn declare_transition(
        &self,
        origin: &str,
        event: &str,
        descriptor: &TransitionDescriptor,
    ) -> Result<(), MachineError> {
        if descriptor.to == ANY_STATE {
            return Err(MachineError::InvalidStateName(descriptor.to.clone()));
        }
        let transition = descriptor.resolve(&self.actions)?;

        {
            let mut states = self.states.borrow_mut();
            if origin != ANY_STATE {
                states.entry(origin.to_string()).or_insert_with(State::empty);
            }
            states
                .entry(descriptor.to.clone())
                .or_insert_with(State::empty);
        }

        self.transitions
            .borrow_mut()
            .entry(origin.to_string())
            .or_default()
            .insert(event.to_string(), transition);
        Ok(())
    }

    /// Register every state, then every transition, from a declarative table,
    /// and apply the table's silent flag.
    ///
    /// The table's starting state must be the machine's own; a machine that
    /// should start elsewhere is created with
    /// [`with_initial`](Self::with_initial). A mismatch is rejected before
    /// anything is registered.
    ///
    /// Stops at the first failing declaration; entries registered before it
    /// remain. Returns the non-fatal diagnostics found, which are also
    /// logged and kept on the machine.
    pub fn configure(&self, config: &MachineConfig) -> Result<Vec<Diagnostic>, MachineError> {
        if config.initial != self.initial {
            return Err(MachineError::InvalidConfig(format!(
                "starting state \"{}\" does not match the machine's \"{}\"",
                config.initial, self.initial
            )));
        }
        self.silent.set(config.silent);

        for (name, descriptor) in &config.states {
            self.declare_state(name, descriptor)?;
        }
        for (origin, events) in &config.transitions {
            for (event, descriptor) in events {
                self.declare_transition(origin, event, descriptor)?;
            }
        }

        let mut found = Vec::new();
        let reachable = {
            let transitions = self.transitions.borrow();
            transitions.contains_key(&self.initial) || transitions.contains_key(ANY_STATE)
        };
        if !reachable {
            let diagnostic = Diagnostic::NoExitFromInitial {
                state: self.initial.clone(),
            };
            warn!(machine = %self.id, "{diagnostic}");
            found.push(diagnostic);
        }

        self.diagnostics.borrow_mut().extend(found.iter().cloned());
        Ok(found)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the state the machine is in.
    pub fn current_state(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn is_in(&self, state: &str) -> bool {
        *self.current.borrow() == state
    }

    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    pub fn is_silent(&self) -> bool {
        self.silent.get()
    }

    /// Suppress (or restore) lifecycle notifications. Actions still run.
    pub fn set_silent(&self, silent: bool) {
        self.silent.set(silent);
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.borrow().contains_key(name)
    }

    /// Declared state names, sorted.
    pub fn state_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.states.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn state_metadata(&self, name: &str) -> Option<Value> {
        self.states.borrow().get(name).map(|s| s.metadata().clone())
    }

    pub fn transition_metadata(&self, origin: &str, event: &str) -> Option<Value> {
        self.transitions
            .borrow()
            .get(origin)
            .and_then(|events| events.get(event))
            .map(|t| t.metadata().clone())
    }

    /// Diagnostics accumulated by every `configure` call so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn emitter(&self) -> Rc<dyn Emitter> {
        Rc::clone(&self.emitter)
    }

    /// Emit `event` on the machine's emitter, the way a host would.
    pub fn trigger(&self, event: &str, args: &[Value]) {
        self.emitter.emit(event, args);
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id)
            .field("current", &*self.current.borrow())
            .field("silent", &self.silent.get())
            .field("states", &self.state_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use serde_json::json;

    fn machine() -> StateMachine {
        let actions = ActionRegistry::new()
            .with("enterHidden1", |_| {})
            .with("visibleToHidden1", |_| {});
        StateMachine::new(EventBus::shared(), actions)
    }

    #[test]
    fn new_machine_starts_in_declared_init_state() {
        let machine = machine();
        assert_eq!(machine.current_state(), INIT_STATE);
        assert!(machine.has_state(INIT_STATE));
        assert!(!machine.is_silent());
    }

    #[test]
    fn wildcard_cannot_be_initial_state() {
        let result = StateMachine::with_initial(EventBus::shared(), ActionRegistry::new(), "*");
        assert!(matches!(result, Err(MachineError::InvalidStateName(_))));
    }

    #[test]
    fn declare_state_rejects_wildcard_name() {
        let machine = machine();
        let err = machine
            .declare_state(ANY_STATE, &StateDescriptor::new())
            .unwrap_err();

        assert_eq!(err, MachineError::InvalidStateName("*".to_string()));
        assert!(!machine.has_state(ANY_STATE));
    }

    #[test]
    fn failed_state_declaration_keeps_previous_entry() {
        let machine = machine();
        let original = StateDescriptor::new()
            .on_enter("enterHidden1")
            .metadata(json!("kept"));
        machine.declare_state("hidden", &original).unwrap();

        let broken = StateDescriptor::new().on_enter("doesNotExist");
        let err = machine.declare_state("hidden", &broken).unwrap_err();

        assert!(matches!(err, MachineError::UnknownAction { .. }));
        assert_eq!(machine.state_metadata("hidden"), Some(json!("kept")));
    }

    #[test]
    fn declare_transition_creates_origin_and_destination() {
        let machine = machine();
        machine
            .declare_transition("visible", "hide", &TransitionDescriptor::to("hidden"))
            .unwrap();

        assert!(machine.has_state("visible"));
        assert!(machine.has_state("hidden"));
    }

    #[test]
    fn wildcard_origin_is_not_created_as_state() {
        let machine = machine();
        machine
            .declare_transition(ANY_STATE, "panic", &TransitionDescriptor::to("panicking"))
            .unwrap();

        assert!(!machine.has_state(ANY_STATE));
        assert!(machine.has_state("panicking"));
    }

    #[test]
    fn failed_transition_declaration_creates_nothing() {
        let machine = machine();
        let descriptor = TransitionDescriptor::to("hidden").action("missing");

        let err = machine
            .declare_transition("visible", "hide", &descriptor)
            .unwrap_err();

        assert!(matches!(err, MachineError::UnknownAction { name } if name == "missing"));
        assert!(!machine.has_state("visible"));
        assert!(!machine.has_state("hidden"));
        assert_eq!(machine.transition_metadata("visible", "hide"), None);
    }

    #[test]
    fn transition_to_wildcard_is_rejected() {
        let machine = machine();
        let err = machine
            .declare_transition("visible", "odd", &TransitionDescriptor::to(ANY_STATE))
            .unwrap_err();
        assert!(matches!(err, MachineError::InvalidStateName(_)));
    }

    #[test]
    fn declaring_existing_state_overwrites_it() {
        let machine = machine();
        machine
            .declare_state("hidden", &StateDescriptor::new().metadata(json!(1)))
            .unwrap();
        machine
            .declare_state("hidden", &StateDescriptor::new().metadata(json!(2)))
            .unwrap();

        assert_eq!(machine.state_metadata("hidden"), Some(json!(2)));
    }

    #[test]
    fn auto_created_destination_does_not_replace_declared_state() {
        let machine = machine();
        machine
            .declare_state("hidden", &StateDescriptor::new().metadata(json!("declared")))
            .unwrap();
        machine
            .declare_transition("visible", "hide", &TransitionDescriptor::to("hidden"))
            .unwrap();

        assert_eq!(machine.state_metadata("hidden"), Some(json!("declared")));
    }

    #[test]
    fn configure_warns_when_initial_state_has_no_exit() {
        let machine = machine();
        let config = MachineConfig::new()
            .transition("visible", "hide", TransitionDescriptor::to("hidden"));

        let diagnostics = machine.configure(&config).unwrap();

        assert_eq!(
            diagnostics,
            vec![Diagnostic::NoExitFromInitial {
                state: INIT_STATE.to_string()
            }]
        );
        assert_eq!(machine.diagnostics(), diagnostics);
    }

    #[test]
    fn configure_accepts_wildcard_exit() {
        let machine = machine();
        let config =
            MachineConfig::new().transition(ANY_STATE, "panic", TransitionDescriptor::to("panicking"));

        assert!(machine.configure(&config).unwrap().is_empty());
    }

    #[test]
    fn configure_registers_states_before_transitions() {
        let machine = machine();
        let config = MachineConfig::new()
            .transition(INIT_STATE, "initialized", TransitionDescriptor::to("visible"))
            .transition("visible", "hide", TransitionDescriptor::to("hidden"))
            .state("hidden", StateDescriptor::new().on_enter("enterHidden1"));

        machine.configure(&config).unwrap();

        assert_eq!(
            machine.state_names(),
            vec!["hidden", "init", "visible"]
        );
    }

    #[test]
    fn configure_stops_at_first_failure_and_keeps_earlier_entries() {
        let machine = machine();
        let config = MachineConfig::new()
            .state("a", StateDescriptor::new().metadata(json!("a")))
            .state("b", StateDescriptor::new().on_enter("nope"));

        let err = machine.configure(&config).unwrap_err();

        assert!(matches!(err, MachineError::UnknownAction { .. }));
        assert!(machine.has_state("a"));
        assert!(!machine.has_state("b"));
    }

    #[test]
    fn configure_applies_silent_flag() {
        let machine = machine();
        let config = MachineConfig::from_json(
            r#"{ "silent": true, "transitions": { "init": { "go": { "to": "gone" } } } }"#,
        )
        .unwrap();

        assert!(machine.configure(&config).unwrap().is_empty());
        assert!(machine.is_silent());
    }

    #[test]
    fn configure_rejects_foreign_starting_state() {
        let machine = machine();
        let config = MachineConfig::from_json(
            r#"{ "initial": "hidden", "transitions": { "hidden": { "show": { "to": "visible" } } } }"#,
        )
        .unwrap();

        let err = machine.configure(&config).unwrap_err();

        assert!(matches!(err, MachineError::InvalidConfig(_)));
        assert_eq!(machine.current_state(), INIT_STATE);
        assert!(!machine.has_state("hidden"));
        assert!(machine.diagnostics().is_empty());
    }

    #[test]
    fn configure_checks_exits_from_configured_starting_state() {
        let machine =
            StateMachine::with_initial(EventBus::shared(), ActionRegistry::new(), "hidden").unwrap();
        let config = MachineConfig::new()
            .initial("hidden")
            .transition("hidden", "show", TransitionDescriptor::to("visible"));

        assert!(machine.configure(&config).unwrap().is_empty());
        assert_eq!(machine.current_state(), "hidden");
    }

    #[test]
    fn transition_metadata_is_exposed() {
        let machine = machine();
        machine
            .declare_transition(
                "visible",
                "hide",
                &TransitionDescriptor::to("hidden").metadata(json!({ "animate": true })),
            )
            .unwrap();

        assert_eq!(
            machine.transition_metadata("visible", "hide"),
            Some(json!({ "animate": true }))
        );
    }
}
