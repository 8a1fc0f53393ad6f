//! Outside-in observation of running machines.
//!
//! [`MachineInspector`] stands in for a visual debugger: it listens to the
//! lifecycle notifications a machine announces, keeps a timestamped
//! [`StateHistory`], and reads the live current state on demand.

mod history;
mod inspector;

pub use history::{StateHistory, TransitionRecord};
pub use inspector::{InspectorSnapshot, MachineInspector, VisitCount};
