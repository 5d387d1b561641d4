//! Simulation harness.
//!
//! Drives a prediction table outside of any schematic editor. It provides:
//! 1. **Event queue:** Time-ordered output deliveries.
//! 2. **Bench:** A `SignalHost` that owns the input levels and applies deliveries.
//! 3. **Scripts:** JSON stimulus sequences run against a bench.

/// Single-component signal host.
pub mod bench;

/// Pending deliveries.
pub mod event_queue;

/// JSON stimulus scripts.
pub mod script;

pub use self::bench::Bench;
pub use self::event_queue::{Delivery, EventQueue};
pub use self::script::{Script, ScriptMode, Step, StepOutput, run_script};
