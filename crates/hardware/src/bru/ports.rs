//! Component Ports and the Host Interface.
//!
//! The table does not own any signals. Each evaluation it samples its inputs through a
//! [`SignalHost`] supplied by the hosting simulator and posts its outputs back as
//! future deliveries. This module provides:
//! 1. **`PortId`:** The nine ports with their names, widths and directions.
//! 2. **`SignalHost`:** What the table needs from the simulator kernel.
//! 3. **`StepInputs`:** A one-shot snapshot of every input, taken at the start of a step.
//! 4. **`Mode`:** Decoding of the mode line.

use std::fmt;

use crate::common::constants::{
    ADDRESS_BUS_BITS, DEST_OUT_BITS, STATUS_OUT_BITS, WRITE_ENABLE_BITS,
};
use crate::common::{Logic, LogicVector, SimTime};

/// Direction of a port, seen from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Driven by the environment.
    In,
    /// Driven by the table.
    Out,
}

/// The ports of the prediction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PortId {
    /// Fetch address (lookup request).
    FetchAddr,
    /// Update address (row and tag to write).
    UpdateAddr,
    /// Update destination (value for COMMIT).
    UpdateDest,
    /// Prediction status output.
    PredStatus,
    /// Prediction destination output, the stored destination shifted left by two.
    PredDest,
    /// 2-bit write-enable code.
    WriteEnable,
    /// Primary clock.
    Clock,
    /// Mode line: `0` resets, `1` runs.
    Mode,
    /// Commit clock; must rise together with the primary clock for a write.
    Commit,
}

impl PortId {
    /// Number of ports.
    pub const COUNT: usize = 9;

    /// All ports, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::FetchAddr,
        Self::UpdateAddr,
        Self::UpdateDest,
        Self::PredStatus,
        Self::PredDest,
        Self::WriteEnable,
        Self::Clock,
        Self::Mode,
        Self::Commit,
    ];

    /// Dense index of this port, `0..COUNT`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Schematic name of the port.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FetchAddr => "PCF",
            Self::UpdateAddr => "PCD",
            Self::UpdateDest => "DESTCD",
            Self::PredStatus => "VP",
            Self::PredDest => "PRED",
            Self::WriteEnable => "nWE",
            Self::Clock => "CLK",
            Self::Mode => "R",
            Self::Commit => "P",
        }
    }

    /// Bit width of the port.
    pub const fn width(self) -> u32 {
        match self {
            Self::FetchAddr | Self::UpdateAddr | Self::UpdateDest => ADDRESS_BUS_BITS,
            Self::PredStatus => STATUS_OUT_BITS,
            Self::PredDest => DEST_OUT_BITS,
            Self::WriteEnable => WRITE_ENABLE_BITS,
            Self::Clock | Self::Mode | Self::Commit => 1,
        }
    }

    /// Direction of the port.
    pub const fn direction(self) -> Direction {
        match self {
            Self::PredStatus | Self::PredDest => Direction::Out,
            _ => Direction::In,
        }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Services the hosting simulator provides to the table.
pub trait SignalHost {
    /// Current simulated time.
    fn now(&self) -> SimTime;

    /// Settled value of a bus input; all `U` if nothing drives it.
    fn vector(&self, port: PortId) -> LogicVector;

    /// Settled level of a single-bit input; `U` if nothing drives it.
    fn bit(&self, port: PortId) -> Logic;

    /// True if `port` rose from low to high in the current step.
    fn has_rising_edge(&self, port: PortId) -> bool;

    /// True if a signal is attached to `port`.
    fn is_connected(&self, port: PortId) -> bool;

    /// Posts `value` onto output `port` at absolute time `time`.
    ///
    /// Posted deliveries are never retracted; the host applies them in time order and a
    /// later delivery to the same port overwrites an earlier one.
    fn deliver(&mut self, port: PortId, value: LogicVector, time: SimTime);
}

/// Decoded mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Level code 2 (`0`): outputs forced undefined, table frozen.
    Reset,
    /// Level code 3 (`1`): normal operation.
    Run,
    /// Any other level: the step does nothing at all.
    Quiescent,
}

impl Mode {
    /// std_logic ordinal of the RESET level.
    pub const RESET_CODE: u8 = Logic::Zero.code();
    /// std_logic ordinal of the RUN level.
    pub const RUN_CODE: u8 = Logic::One.code();

    /// Decodes the mode line level.
    pub const fn from_logic(level: Logic) -> Self {
        match level.code() {
            Self::RESET_CODE => Self::Reset,
            Self::RUN_CODE => Self::Run,
            _ => Self::Quiescent,
        }
    }
}

/// Every input of one evaluation step, sampled once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInputs {
    /// Time of the step.
    pub now: SimTime,
    /// Fetch address bus.
    pub fetch: LogicVector,
    /// Update address bus.
    pub update: LogicVector,
    /// Update destination bus.
    pub dest: LogicVector,
    /// Write-enable code.
    pub write_enable: LogicVector,
    /// Primary clock level.
    pub clock: Logic,
    /// Primary clock rose this step.
    pub clock_rising: bool,
    /// Commit clock rose this step.
    pub commit_rising: bool,
    /// Mode line level.
    pub mode: Logic,
}

impl StepInputs {
    /// Samples all inputs from `host`.
    pub fn sample<H: SignalHost + ?Sized>(host: &H) -> Self {
        Self {
            now: host.now(),
            fetch: host.vector(PortId::FetchAddr),
            update: host.vector(PortId::UpdateAddr),
            dest: host.vector(PortId::UpdateDest),
            write_enable: host.vector(PortId::WriteEnable),
            clock: host.bit(PortId::Clock),
            clock_rising: host.has_rising_edge(PortId::Clock),
            commit_rising: host.has_rising_edge(PortId::Commit),
            mode: host.bit(PortId::Mode),
        }
    }

    /// Decoded mode.
    pub const fn mode(&self) -> Mode {
        Mode::from_logic(self.mode)
    }

    /// True if both clocks rose in this step.
    pub const fn write_gate_open(&self) -> bool {
        self.clock_rising && self.commit_rising
    }
}
