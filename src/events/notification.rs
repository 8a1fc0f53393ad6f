//! Lifecycle notifications announced during a transition.

use std::fmt;

const LEAVE_PREFIX: &str = "leaveState:";
const ENTER_PREFIX: &str = "enterState:";

/// Name of the notification emitted between leave and enter.
pub const TRANSITION_EVENT: &str = "transition";

/// A lifecycle notification, as emitted on the host's event channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// `leaveState:<state>`
    LeaveState(String),
    /// `transition`, carrying `(from, to, ..args)`
    Transition,
    /// `enterState:<state>`
    EnterState(String),
}

impl Notification {
    /// Recognize a lifecycle notification from its event name.
    pub fn parse(event: &str) -> Option<Self> {
        if let Some(state) = event.strip_prefix(LEAVE_PREFIX) {
            Some(Self::LeaveState(state.to_string()))
        } else if let Some(state) = event.strip_prefix(ENTER_PREFIX) {
            Some(Self::EnterState(state.to_string()))
        } else if event == TRANSITION_EVENT {
            Some(Self::Transition)
        } else {
            None
        }
    }

    pub fn event_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeaveState(state) => write!(f, "{LEAVE_PREFIX}{state}"),
            Self::Transition => f.write_str(TRANSITION_EVENT),
            Self::EnterState(state) => write!(f, "{ENTER_PREFIX}{state}"),
        }
    }
}

/// `leaveState:<state>`
pub fn leave_state_event(state: &str) -> String {
    Notification::LeaveState(state.to_string()).event_name()
}

/// `enterState:<state>`
pub fn enter_state_event(state: &str) -> String {
    Notification::EnterState(state.to_string()).event_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_follow_prefix_convention() {
        assert_eq!(leave_state_event("visible"), "leaveState:visible");
        assert_eq!(enter_state_event("hidden"), "enterState:hidden");
        assert_eq!(Notification::Transition.event_name(), "transition");
    }

    #[test]
    fn parse_recognizes_lifecycle_events() {
        assert_eq!(
            Notification::parse("leaveState:visible"),
            Some(Notification::LeaveState("visible".to_string()))
        );
        assert_eq!(
            Notification::parse("enterState:hidden"),
            Some(Notification::EnterState("hidden".to_string()))
        );
        assert_eq!(Notification::parse("transition"), Some(Notification::Transition));
    }

    #[test]
    fn parse_ignores_ordinary_events() {
        assert_eq!(Notification::parse("hide"), None);
        assert_eq!(Notification::parse("showTime"), None);
        assert_eq!(Notification::parse("enterState"), None);
    }
}
