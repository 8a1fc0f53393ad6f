//! Visibility State Machine
//!
//! This example drives a small visible/hidden machine through an event bus.
//!
//! Key concepts:
//! - Declarative configuration loaded from JSON
//! - Named actions resolved against a registry
//! - Lifecycle notifications observed on the same bus
//! - A wildcard transition reachable from every state
//! - An inspector mirroring the machine for debugging
//!
//! Run with: RUST_LOG=debug cargo run --example visibility

use serde_json::{json, Value};
use statehook::actions;
use statehook::builder::StateMachineBuilder;
use statehook::events::{Emitter, EventBus, ALL_EVENTS};
use statehook::inspect::MachineInspector;
use statehook::machine::MachineConfig;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"{
    "transitions": {
        "init": { "initialized": { "to": "visible" } },
        "visible": { "hide": { "to": "hidden", "actions": ["fadeOut"] } },
        "hidden": { "show": { "to": "visible", "actions": ["fadeIn"], "triggers": "showTime" } },
        "*": { "panic": { "to": "panicking" } }
    },
    "states": {
        "visible": { "enter": ["greet"], "metadata": { "className": "shown" } },
        "hidden": { "enter": ["hush"], "metadata": { "className": "hiddenBehindTree" } }
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Visibility State Machine Example ===\n");

    let bus = EventBus::shared();
    bus.bind(
        ALL_EVENTS,
        Rc::new(|event: &str, args: &[Value]| println!("  event  {event} {args:?}")),
    );

    let machine = StateMachineBuilder::new()
        .emitter(bus.clone())
        .actions(actions! {
            "fadeOut" => |args: &[Value]| println!("  action fadeOut {args:?}"),
            "fadeIn" => |args: &[Value]| println!("  action fadeIn {args:?}"),
            "greet" => |_: &[Value]| println!("  action greet"),
            "hush" => |_: &[Value]| println!("  action hush"),
        })
        .config(MachineConfig::from_json(CONFIG)?)
        .build()?;
    let inspector = MachineInspector::attach(&machine);

    println!("Handled events: {:?}", machine.handled_events());
    println!("Initial state: {}\n", machine.current_state());

    for (event, args) in [
        ("initialized", vec![]),
        ("hide", vec![json!("behind a tree")]),
        ("show", vec![json!("shamelessly")]),
        ("panic", vec![]),
    ] {
        println!("emit {event}");
        bus.emit(event, &args);
        println!(
            "  now in {} (class {})\n",
            machine.current_state(),
            machine
                .state_metadata(&machine.current_state())
                .and_then(|m| m.get("className").cloned())
                .unwrap_or(Value::Null)
        );
    }

    println!("Inspector: {}", inspector.render());
    println!("Path: {:?}", inspector.history().get_path());
    println!("{}", serde_json::to_string_pretty(&inspector.snapshot())?);

    println!("\n=== Example Complete ===");
    Ok(())
}
