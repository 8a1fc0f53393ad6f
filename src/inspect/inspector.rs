//! An observer that mirrors a machine for debugging.

use super::history::{StateHistory, TransitionRecord};
use crate::events::{Notification, ALL_EVENTS};
use crate::machine::StateMachine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::{Rc, Weak};
use tracing::trace;
use uuid::Uuid;

/// Enter/leave notification counts for one state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitCount {
    pub entered: usize,
    pub left: usize,
}

/// Point-in-time view of an inspected machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InspectorSnapshot {
    pub machine: Uuid,
    /// `None` once the machine has been dropped.
    pub current_state: Option<String>,
    pub handled_events: BTreeSet<String>,
    pub visits: BTreeMap<String, VisitCount>,
    pub history: StateHistory,
}

#[derive(Default)]
struct Observed {
    history: StateHistory,
    visits: BTreeMap<String, VisitCount>,
}

/// Watches a machine from the outside.
///
/// The inspector subscribes to the machine's emitter and records what the
/// lifecycle notifications say; it never takes part in resolving events. A
/// silent machine therefore leaves no trace in the history, while
/// [`current_state`](Self::current_state) always reads the live value.
pub struct MachineInspector {
    machine_id: Uuid,
    machine: Weak<StateMachine>,
    observed: RefCell<Observed>,
}

impl MachineInspector {
    /// Subscribe to `machine`'s notifications.
    pub fn attach(machine: &Rc<StateMachine>) -> Rc<Self> {
        let inspector = Rc::new(Self {
            machine_id: machine.id(),
            machine: Rc::downgrade(machine),
            observed: RefCell::new(Observed::default()),
        });

        let weak = Rc::downgrade(&inspector);
        machine.emitter().bind(
            ALL_EVENTS,
            Rc::new(move |event: &str, args: &[Value]| {
                if let Some(inspector) = weak.upgrade() {
                    inspector.observe(event, args);
                }
            }),
        );
        inspector
    }

    fn observe(&self, event: &str, args: &[Value]) {
        let Some(notification) = Notification::parse(event) else {
            return;
        };
        trace!(machine = %self.machine_id, event, "inspector observed notification");

        let mut observed = self.observed.borrow_mut();
        match notification {
            Notification::LeaveState(state) => {
                observed.visits.entry(state).or_default().left += 1;
            }
            Notification::EnterState(state) => {
                observed.visits.entry(state).or_default().entered += 1;
            }
            Notification::Transition => {
                if let Some(record) = TransitionRecord::from_notification(args, Utc::now()) {
                    observed.history = observed.history.record(record);
                }
            }
        }
    }

    pub fn machine_id(&self) -> Uuid {
        self.machine_id
    }

    /// Live state of the machine, or `None` if it has been dropped.
    pub fn current_state(&self) -> Option<String> {
        self.machine.upgrade().map(|m| m.current_state())
    }

    pub fn history(&self) -> StateHistory {
        self.observed.borrow().history.clone()
    }

    pub fn visits(&self, state: &str) -> VisitCount {
        self.observed
            .borrow()
            .visits
            .get(state)
            .copied()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> InspectorSnapshot {
        let machine = self.machine.upgrade();
        let observed = self.observed.borrow();
        InspectorSnapshot {
            machine: self.machine_id,
            current_state: machine.as_ref().map(|m| m.current_state()),
            handled_events: machine.map(|m| m.handled_events()).unwrap_or_default(),
            visits: observed.visits.clone(),
            history: observed.history.clone(),
        }
    }

    /// One-line summary, e.g. `[3f2a…] hidden (2 transitions)`.
    pub fn render(&self) -> String {
        let id = self.machine_id.simple().to_string();
        let state = self
            .current_state()
            .unwrap_or_else(|| "<dropped>".to_string());
        format!(
            "[{}] {} ({} transitions)",
            &id[..8],
            state,
            self.observed.borrow().history.len()
        )
    }
}
