//! Event resolution and the transition protocol.

use super::state_machine::{Dispatch, StateMachine};
use crate::core::{invoke_all, Action, Transition, ANY_STATE};
use crate::error::MachineError;
use crate::events::{enter_state_event, leave_state_event, TRANSITION_EVENT};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, trace};

impl StateMachine {
    /// Resolve `event` against the current state and run the matching
    /// transition, if any.
    ///
    /// A transition registered for the current state wins over one
    /// registered for [`ANY_STATE`]. When neither exists nothing runs and
    /// nothing is emitted.
    ///
    /// Protocol, with `L` the state being left and `E` the destination:
    /// 1. emit `leaveState:L`
    /// 2. run the leave actions of `L`
    /// 3. emit `transition` with `(L, E, ..args)`
    /// 4. emit the transition's secondary event, if declared
    /// 5. run the transition actions
    /// 6. emit `enterState:E`
    /// 7. enter `E` exactly as [`to_state`](Self::to_state) does
    ///
    /// Emits are skipped when the machine is silent; actions always run.
    pub fn dispatch(&self, event: &str, args: &[Value]) -> Dispatch {
        let from = self.current_state();
        let Some(transition) = self.resolve(&from, event) else {
            trace!(machine = %self.id, event, state = %from, "no transition for event");
            return Dispatch::Unhandled;
        };

        debug!(
            machine = %self.id,
            event,
            from = %from,
            to = transition.destination(),
            "running transition"
        );
        self.run(&from, &transition, args);
        Dispatch::Handled
    }

    /// Jump to `name`: run its enter actions, then make it current.
    ///
    /// No leave actions run and no notifications are emitted.
    pub fn to_state(&self, name: &str, args: &[Value]) -> Result<(), MachineError> {
        if !self.has_state(name) {
            return Err(MachineError::UnknownState {
                name: name.to_string(),
            });
        }
        self.enter(name, args);
        Ok(())
    }

    /// Every event that can trigger a transition from some state, the
    /// wildcard included.
    pub fn handled_events(&self) -> BTreeSet<String> {
        self.transitions
            .borrow()
            .values()
            .flat_map(|events| events.keys().cloned())
            .collect()
    }

    fn resolve(&self, state: &str, event: &str) -> Option<Transition> {
        let transitions = self.transitions.borrow();
        transitions
            .get(state)
            .and_then(|events| events.get(event))
            .or_else(|| transitions.get(ANY_STATE).and_then(|events| events.get(event)))
            .cloned()
    }

    fn run(&self, leave: &str, transition: &Transition, args: &[Value]) {
        let silent = self.silent.get();
        let enter = transition.destination();

        if !silent {
            self.emitter.emit(&leave_state_event(leave), args);
        }
        invoke_all(&self.leave_actions(leave), args);

        if !silent {
            let mut notification = Vec::with_capacity(args.len() + 2);
            notification.push(Value::from(leave));
            notification.push(Value::from(enter));
            notification.extend_from_slice(args);
            self.emitter.emit(TRANSITION_EVENT, &notification);

            if let Some(secondary) = transition.triggers() {
                self.emitter.emit(secondary, args);
            }
        }
        invoke_all(transition.actions(), args);

        if !silent {
            self.emitter.emit(&enter_state_event(enter), args);
        }
        self.enter(enter, args);
    }

    // The only place the current state is written.
    fn enter(&self, name: &str, args: &[Value]) {
        let actions = self
            .states
            .borrow()
            .get(name)
            .map(|state| state.enter_actions().to_vec())
            .unwrap_or_default();
        invoke_all(&actions, args);
        *self.current.borrow_mut() = name.to_string();
    }

    fn leave_actions(&self, name: &str) -> Vec<Action> {
        self.states
            .borrow()
            .get(name)
            .map(|state| state.leave_actions().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{ActionRegistry, StateDescriptor, TransitionDescriptor, ANY_STATE};
    use crate::error::MachineError;
    use crate::events::{EventBus, ALL_EVENTS};
    use crate::machine::{Dispatch, StateMachine};
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn registry(log: &Log, names: &[&'static str]) -> ActionRegistry {
        let mut registry = ActionRegistry::new();
        for &name in names {
            let log = Rc::clone(log);
            registry.insert(name, move |args: &[Value]| {
                log.borrow_mut().push(format!("{name}{args:?}"));
            });
        }
        registry
    }

    fn visibility_machine(log: &Log) -> StateMachine {
        let actions = registry(log, &["l1", "l2", "a1", "a2", "e1"]);
        let machine = StateMachine::with_initial(EventBus::shared(), actions, "visible").unwrap();
        machine
            .declare_state("visible", &StateDescriptor::new().on_leave("l1").on_leave("l2"))
            .unwrap();
        machine
            .declare_state("hidden", &StateDescriptor::new().on_enter("e1"))
            .unwrap();
        machine
            .declare_transition(
                "visible",
                "hide",
                &TransitionDescriptor::to("hidden").action("a1").action("a2"),
            )
            .unwrap();
        machine
    }

    #[test]
    fn dispatch_runs_leave_transition_enter_in_order() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);

        let outcome = machine.dispatch("hide", &[json!("x")]);

        assert_eq!(outcome, Dispatch::Handled);
        assert_eq!(machine.current_state(), "hidden");
        assert_eq!(
            *log.borrow(),
            vec![
                "l1[String(\"x\")]",
                "l2[String(\"x\")]",
                "a1[String(\"x\")]",
                "a2[String(\"x\")]",
                "e1[String(\"x\")]",
            ]
        );
    }

    #[test]
    fn unmatched_event_is_a_noop() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);

        let outcome = machine.dispatch("show", &[]);

        assert_eq!(outcome, Dispatch::Unhandled);
        assert!(!outcome.is_handled());
        assert_eq!(machine.current_state(), "visible");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn exact_state_beats_wildcard() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);
        machine
            .declare_transition(ANY_STATE, "hide", &TransitionDescriptor::to("gone"))
            .unwrap();

        machine.dispatch("hide", &[]);

        assert_eq!(machine.current_state(), "hidden");
    }

    #[test]
    fn wildcard_applies_from_any_state() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);
        machine
            .declare_transition(ANY_STATE, "panic", &TransitionDescriptor::to("panicking"))
            .unwrap();

        assert!(machine.dispatch("panic", &[]).is_handled());
        assert_eq!(machine.current_state(), "panicking");
        assert!(machine.dispatch("panic", &[]).is_handled());
        assert_eq!(machine.current_state(), "panicking");
    }

    #[test]
    fn to_state_runs_enter_actions_only() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);

        machine.to_state("hidden", &[json!("in the box")]).unwrap();

        assert_eq!(machine.current_state(), "hidden");
        assert_eq!(*log.borrow(), vec!["e1[String(\"in the box\")]"]);
    }

    #[test]
    fn to_state_rejects_unknown_state() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);

        let err = machine.to_state("nowhere", &[]).unwrap_err();

        assert_eq!(
            err,
            MachineError::UnknownState {
                name: "nowhere".to_string()
            }
        );
        assert_eq!(machine.current_state(), "visible");
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn to_state_emits_nothing() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);
        let seen: Log = Rc::default();
        let sink = Rc::clone(&seen);
        machine.emitter().bind(
            ALL_EVENTS,
            Rc::new(move |event: &str, _args: &[Value]| sink.borrow_mut().push(event.to_string())),
        );

        machine.to_state("hidden", &[]).unwrap();

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn handled_events_are_deduplicated_across_origins() {
        let log: Log = Rc::default();
        let machine = visibility_machine(&log);
        machine
            .declare_transition("hidden", "hide", &TransitionDescriptor::to("hidden"))
            .unwrap();
        machine
            .declare_transition(ANY_STATE, "panic", &TransitionDescriptor::to("panicking"))
            .unwrap();
        machine
            .declare_transition("panicking", "panic", &TransitionDescriptor::to("visible"))
            .unwrap();

        let events: Vec<String> = machine.handled_events().into_iter().collect();

        assert_eq!(events, vec!["hide", "panic"]);
    }

    #[test]
    fn self_transition_runs_leave_and_enter() {
        let log: Log = Rc::default();
        let actions = registry(&log, &["leave", "enter"]);
        let machine = StateMachine::with_initial(EventBus::shared(), actions, "idle").unwrap();
        machine
            .declare_state("idle", &StateDescriptor::new().on_enter("enter").on_leave("leave"))
            .unwrap();
        machine
            .declare_transition("idle", "tick", &TransitionDescriptor::to("idle"))
            .unwrap();

        machine.dispatch("tick", &[]);

        assert_eq!(*log.borrow(), vec!["leave[]", "enter[]"]);
        assert!(machine.is_in("idle"));
    }
}
