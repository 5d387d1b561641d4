//! Branch resolution unit: the tagged prediction table.
//!
//! This module contains the predictor word layout, the component's port interface
//! and the table state machine that ties them to a [`crate::memory::WordStore`].

pub use self::encoding::{PredictorWord, WriteEnable};
pub use self::ports::{Direction, Mode, PortId, SignalHost, StepInputs};
pub use self::table::{Prediction, PredictionTable, StandardValues, UpdateKind, WriteOutcome};

/// Predictor word packing and bus field extraction.
pub mod encoding;

/// Port identifiers and the simulator host interface.
pub mod ports;

/// The prediction table component.
pub mod table;
