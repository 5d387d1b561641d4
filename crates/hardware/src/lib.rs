//! Tagged branch-target prediction table.
//!
//! This crate models a direct-mapped, tagged prediction table as a clocked simulation
//! component with the following:
//! 1. **Memory:** A masked word store with fills, shadow registers, change listeners, and the
//!    `ADDRESS:VALUE` hex persistence format.
//! 2. **BRU:** The predictor word layout, the port interface and the RESET/RUN state machine
//!    with its dual-clock update path and tag-compare lookup path.
//! 3. **Simulation:** An event queue, a single-component bench and JSON stimulus scripts.
//! 4. **Support:** Configuration, statistics, logic levels and simulated time.

/// Predictor word layout, ports and the prediction table.
pub mod bru;
/// Common types and constants (logic levels, time, errors, escaping).
pub mod common;
/// Component configuration (defaults, JSON structures, configuration strings).
pub mod config;
/// Word store, listeners, labels and persistence.
pub mod memory;
/// Bench, event queue and stimulus scripts.
pub mod sim;
/// Prediction table statistics.
pub mod stats;

/// The prediction table component; construct with `PredictionTable::new`.
pub use crate::bru::PredictionTable;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Word storage underneath the table.
pub use crate::memory::WordStore;
/// Single-component simulation host.
pub use crate::sim::Bench;
