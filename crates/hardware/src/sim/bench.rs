//! Test Bench.
//!
//! A minimal single-component simulator kernel. It holds the current level of every input,
//! detects rising edges on the single-bit lines, applies output deliveries in time order and
//! keeps a log of everything the component posted. This module provides:
//! 1. **Driving:** `drive`, `drive_bit` and `drive_value` set inputs; a low-to-high change on
//!    a 1-bit port is recorded as a rising edge until the next evaluation completes.
//! 2. **Evaluation:** `evaluate` runs one table step at the current time.
//! 3. **Time:** `advance_to` and `advance_by` move time forward and apply due deliveries.

use tracing::trace;

use super::event_queue::{Delivery, EventQueue};
use crate::bru::{Direction, PortId, PredictionTable, SignalHost};
use crate::common::{Logic, LogicVector, SimTime};

/// Signal state surrounding one prediction table.
#[derive(Debug)]
pub struct Bench {
    now: SimTime,
    signals: [LogicVector; PortId::COUNT],
    rising: [bool; PortId::COUNT],
    connected: [bool; PortId::COUNT],
    queue: EventQueue,
    log: Vec<Delivery>,
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

impl Bench {
    /// Creates a bench at time zero with every port undriven and unconnected.
    pub fn new() -> Self {
        Self {
            now: SimTime::ZERO,
            signals: PortId::ALL.map(|p| LogicVector::undefined(p.width())),
            rising: [false; PortId::COUNT],
            connected: [false; PortId::COUNT],
            queue: EventQueue::new(),
            log: Vec::new(),
        }
    }

    /// Sets an input to `value` and marks the port connected.
    ///
    /// A wider `value` is truncated to the port width.
    pub fn drive(&mut self, port: PortId, value: LogicVector) {
        let width = port.width();
        let value = value.subset(width - 1, 0);
        let i = port.index();
        if width == 1 && self.signals[i].bit(0).is_low() && value.bit(0).is_high() {
            self.rising[i] = true;
        }
        self.signals[i] = value;
        self.connected[i] = true;
    }

    /// Drives a single-bit port.
    pub fn drive_bit(&mut self, port: PortId, level: Logic) {
        self.drive(port, LogicVector::from_levels(&[level]));
    }

    /// Drives a port with a fully defined value.
    pub fn drive_value(&mut self, port: PortId, value: u64) {
        self.drive(port, LogicVector::new(port.width(), value));
    }

    /// Attaches or detaches a port without changing its level.
    pub fn set_connected(&mut self, port: PortId, connected: bool) {
        self.connected[port.index()] = connected;
    }

    /// Forgets every recorded rising edge.
    pub fn clear_edges(&mut self) {
        self.rising = [false; PortId::COUNT];
    }

    /// Runs one table step at the current time, then clears edges.
    pub fn evaluate(&mut self, table: &mut PredictionTable) {
        table.evaluate(self);
        self.clear_edges();
    }

    /// Runs the elaboration step of `table`.
    pub fn elaborate(&mut self, table: &PredictionTable) {
        table.elaborate(self);
        self.apply_due();
    }

    /// Moves time forward to `time`, applying every delivery due by then.
    ///
    /// Going backwards is a no-op.
    pub fn advance_to(&mut self, time: SimTime) {
        if time > self.now {
            self.now = time;
        }
        self.apply_due();
    }

    /// Moves time forward by `delta`.
    pub fn advance_by(&mut self, delta: SimTime) {
        self.advance_to(self.now + delta);
    }

    fn apply_due(&mut self) {
        while let Some(d) = self.queue.pop_due(self.now) {
            trace!(time = %d.time, port = %d.port, value = %d.value, "apply");
            self.signals[d.port.index()] = d.value;
        }
    }

    /// Current value of any port.
    pub fn output(&self, port: PortId) -> LogicVector {
        self.signals[port.index()]
    }

    /// Every delivery posted so far, in posting order.
    pub fn deliveries(&self) -> &[Delivery] {
        &self.log
    }

    /// Number of deliveries not yet applied.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl SignalHost for Bench {
    fn now(&self) -> SimTime {
        self.now
    }

    fn vector(&self, port: PortId) -> LogicVector {
        self.signals[port.index()]
    }

    fn bit(&self, port: PortId) -> Logic {
        self.signals[port.index()].bit(0)
    }

    fn has_rising_edge(&self, port: PortId) -> bool {
        self.rising[port.index()]
    }

    fn is_connected(&self, port: PortId) -> bool {
        self.connected[port.index()]
    }

    fn deliver(&mut self, port: PortId, value: LogicVector, time: SimTime) {
        debug_assert_eq!(port.direction(), Direction::Out);
        let delivery = Delivery { time, port, value };
        self.log.push(delivery);
        self.queue.push(delivery);
    }
}
