//! Common utilities and types used throughout the prediction-table model.
//!
//! This module provides the building blocks shared by every other module. It includes:
//! 1. **Constants:** Word layout, bus layout, port widths and timing.
//! 2. **Logic:** Nine-valued wire levels and logic vectors.
//! 3. **Time:** A strong type for simulated time.
//! 4. **Error Handling:** Memory, codec and configuration error types.
//! 5. **Escaping:** Encoding of resource names inside configuration strings.

/// Common constants used throughout the model.
pub mod constants;

/// Error types.
pub mod error;

/// Logic levels and vectors.
pub mod logic;

/// Resource-name escaping.
pub mod mangle;

/// Simulated time.
pub mod time;

pub use error::{CodecError, ConfigError, Error, MemoryError};
pub use logic::{Logic, LogicVector};
pub use time::SimTime;
