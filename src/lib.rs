//! Statehook: a declarative finite state machine driven by named events
//!
//! A [`StateMachine`] is owned by a host and listens on the host's event
//! channel. Each incoming event is resolved against the current state (with a
//! `*` wildcard fallback); a matching transition runs leave actions,
//! transition actions and enter actions in a fixed order while announcing
//! `leaveState:<L>`, `transition`, and `enterState:<E>` on the same channel.
//!
//! # Core Concepts
//!
//! - **Actions**: host callables registered by name in an [`ActionRegistry`]
//! - **States / Transitions**: declared from descriptors naming those actions
//! - **Emitter**: the `bind`/`emit` capability the machine is driven by
//! - **Silent mode**: suppresses notifications while still running actions
//!
//! # Example
//!
//! ```rust
//! use statehook::builder::StateMachineBuilder;
//! use statehook::core::{StateDescriptor, TransitionDescriptor};
//! use statehook::events::{Emitter, EventBus};
//! use serde_json::json;
//!
//! let bus = EventBus::shared();
//! let machine = StateMachineBuilder::new()
//!     .emitter(bus.clone())
//!     .initial("visible")
//!     .action("fadeOut", |_args| {})
//!     .state("hidden", StateDescriptor::new().on_enter("fadeOut"))
//!     .add_transition("visible", "hide", TransitionDescriptor::to("hidden"))
//!     .build()
//!     .unwrap();
//!
//! bus.emit("hide", &[json!("behind a tree")]);
//! assert_eq!(machine.current_state(), "hidden");
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod events;
pub mod inspect;
pub mod machine;

// Re-export commonly used types
pub use crate::core::{ActionRegistry, StateDescriptor, TransitionDescriptor, ANY_STATE, INIT_STATE};
pub use error::MachineError;
pub use events::{Emitter, EventBus};
pub use machine::{Diagnostic, Dispatch, MachineConfig, StateMachine};
