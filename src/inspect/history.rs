//! Transition history as observed through lifecycle notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Record of a single observed transition.
///
/// # Example
///
/// ```rust
/// use statehook::inspect::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "visible".to_string(),
///     to: "hidden".to_string(),
///     args: vec![],
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "hidden");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The state being left
    pub from: String,
    /// The state being entered
    pub to: String,
    /// Extra arguments carried by the triggering event
    pub args: Vec<Value>,
    /// When the notification was observed
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Build a record from the arguments of a `transition` notification,
    /// which are `(from, to, ..args)`.
    pub fn from_notification(args: &[Value], timestamp: DateTime<Utc>) -> Option<Self> {
        match args {
            [Value::String(from), Value::String(to), rest @ ..] => Some(Self {
                from: from.clone(),
                to: to.clone(),
                args: rest.to_vec(),
                timestamp,
            }),
            _ => None,
        }
    }
}

/// Ordered history of observed transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition appended.
///
/// ```rust
/// use statehook::inspect::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(TransitionRecord {
///         from: "init".into(),
///         to: "visible".into(),
///         args: vec![],
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: "visible".into(),
///         to: "hidden".into(),
///         args: vec![],
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec!["init", "visible", "hidden"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// States traversed: the first origin, then each destination.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(first.from.as_str());
        }
        for transition in &self.transitions {
            path.push(transition.to.as_str());
        }
        path
    }

    /// Time between the first and last observed transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
