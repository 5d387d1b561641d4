//! Stimulus scripts.
//!
//! A script is a JSON list of steps. Each step drives the inputs, pulses the clocks it names,
//! evaluates the table once and then lets time advance so that the outputs settle.
//!
//! ```json
//! { "steps": [
//!     { "mode": "run", "update": 89, "dest": 171, "write_enable": 3, "clock": true, "commit": true },
//!     { "fetch": 89 }
//! ] }
//! ```
//!
//! Bus fields that are absent keep their previous level (undefined until first driven).
//! `write_enable` defaults to idle on every step.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bench::Bench;
use crate::bru::{PortId, PredictionTable, SignalHost};
use crate::common::{ConfigError, Logic, SimTime};

/// Default settle time after each step, in nanoseconds.
const DEFAULT_ADVANCE_NS: u64 = 100;

const fn default_advance() -> u64 {
    DEFAULT_ADVANCE_NS
}

/// Mode line level for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptMode {
    /// Drive `0`.
    Reset,
    /// Drive `1`.
    Run,
    /// Drive `Z`; the table ignores the step.
    Hold,
}

impl ScriptMode {
    const fn level(self) -> Logic {
        match self {
            Self::Reset => Logic::Zero,
            Self::Run => Logic::One,
            Self::Hold => Logic::Z,
        }
    }
}

/// One stimulus step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    /// Fetch address bus.
    pub fetch: Option<u64>,
    /// Update address bus.
    pub update: Option<u64>,
    /// Update destination bus.
    pub dest: Option<u64>,
    /// Write-enable code, `0` when absent.
    #[serde(default)]
    pub write_enable: u64,
    /// Pulse the primary clock.
    #[serde(default)]
    pub clock: bool,
    /// Pulse the commit clock.
    #[serde(default)]
    pub commit: bool,
    /// Mode line; unchanged when absent.
    pub mode: Option<ScriptMode>,
    /// Time to advance after the step.
    #[serde(default = "default_advance")]
    pub advance_ns: u64,
}

/// A sequence of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    /// Steps in execution order.
    pub steps: Vec<Step>,
}

impl Script {
    /// Parses a script from JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Settled outputs after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutput {
    /// Step index.
    pub step: usize,
    /// Time at which the step was evaluated, in nanoseconds.
    pub time_ns: u64,
    /// Status output, `None` if undefined.
    pub status: Option<u64>,
    /// Destination output, `None` if undefined.
    pub dest: Option<u64>,
}

/// Runs `script` against `table` on a fresh bench and returns the settled outputs.
///
/// Every port is connected for the duration of the run.
pub fn run_script(table: &mut PredictionTable, script: &Script) -> Vec<StepOutput> {
    let mut bench = Bench::new();
    for port in PortId::ALL {
        bench.set_connected(port, true);
    }
    bench.drive_bit(PortId::Clock, Logic::Zero);
    bench.drive_bit(PortId::Commit, Logic::Zero);
    bench.elaborate(table);

    let mut outputs = Vec::with_capacity(script.steps.len());
    for (i, step) in script.steps.iter().enumerate() {
        apply_step(&mut bench, step);
        let time = bench.now().as_ns();
        bench.evaluate(table);
        bench.advance_by(SimTime::from_ns(step.advance_ns));

        let out = StepOutput {
            step: i,
            time_ns: time,
            status: bench.output(PortId::PredStatus).value(),
            dest: bench.output(PortId::PredDest).value(),
        };
        debug!(step = i, time_ns = time, status = ?out.status, dest = ?out.dest, "step");
        outputs.push(out);
    }
    outputs
}

fn apply_step(bench: &mut Bench, step: &Step) {
    if let Some(mode) = step.mode {
        bench.drive_bit(PortId::Mode, mode.level());
    }
    let buses = [
        (PortId::FetchAddr, step.fetch),
        (PortId::UpdateAddr, step.update),
        (PortId::UpdateDest, step.dest),
    ];
    for (port, value) in buses {
        if let Some(v) = value {
            bench.drive_value(port, v);
        }
    }
    bench.drive_value(PortId::WriteEnable, step.write_enable);

    for (port, pulse) in [(PortId::Clock, step.clock), (PortId::Commit, step.commit)] {
        bench.drive_bit(port, Logic::Zero);
        if pulse {
            bench.drive_bit(port, Logic::One);
        }
    }
}
