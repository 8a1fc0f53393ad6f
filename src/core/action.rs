//! Named actions and the registry that resolves them.
//!
//! Descriptors refer to actions by name. The host hands the machine an
//! [`ActionRegistry`] mapping those names to callables, and every name is
//! resolved when a state or transition is declared, so a typo fails at
//! registration rather than halfway through a transition.

use crate::error::MachineError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A callable invoked with the extra arguments of the triggering event.
///
/// Actions are reference counted so a transition can hand out copies of its
/// action list without keeping the machine's tables borrowed while they run.
#[derive(Clone)]
pub struct Action {
    name: String,
    callback: Rc<dyn Fn(&[Value])>,
}

impl Action {
    /// Wrap a closure as a named action.
    pub fn new<F>(name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        Self {
            name: name.into(),
            callback: Rc::new(callback),
        }
    }

    /// Name the action was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the action with the given arguments.
    pub fn invoke(&self, args: &[Value]) {
        (self.callback)(args)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// Host-supplied mapping from action name to callable.
#[derive(Clone, Debug, Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Action>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an action under `name`.
    pub fn insert<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&[Value]) + 'static,
    {
        let name = name.into();
        self.actions.insert(name.clone(), Action::new(name, callback));
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&[Value]) + 'static,
    {
        self.insert(name, callback);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Resolve a list of names into actions, preserving order.
    ///
    /// Fails on the first name the registry does not know.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Action>, MachineError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.actions
                    .get(name)
                    .cloned()
                    .ok_or_else(|| MachineError::UnknownAction {
                        name: name.to_string(),
                    })
            })
            .collect()
    }
}

/// Invoke each action in order with the same arguments.
pub(crate) fn invoke_all(actions: &[Action], args: &[Value]) {
    for action in actions {
        action.invoke(args);
    }
}
