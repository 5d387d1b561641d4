//! Pending output deliveries.
//!
//! Deliveries are kept in a min-heap keyed by time, with ties broken by insertion order so
//! that a later post to the same port at the same time wins when applied.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::bru::PortId;
use crate::common::{LogicVector, SimTime};

/// A value scheduled onto an output port.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delivery {
    /// Absolute time at which the value becomes visible.
    pub time: SimTime,
    /// Target port.
    pub port: PortId,
    /// Value to apply.
    pub value: LogicVector,
}

#[derive(Debug, PartialEq, Eq)]
struct Pending {
    seq: u64,
    delivery: Delivery,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.delivery
            .time
            .cmp(&other.delivery.time)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Time-ordered queue of deliveries.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `delivery`.
    pub fn push(&mut self, delivery: Delivery) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Pending { seq, delivery }));
    }

    /// Removes and returns the earliest delivery due at or before `time`.
    pub fn pop_due(&mut self, time: SimTime) -> Option<Delivery> {
        if self.peek_time()? > time {
            return None;
        }
        self.heap.pop().map(|Reverse(p)| p.delivery)
    }

    /// Time of the earliest pending delivery.
    pub fn peek_time(&self) -> Option<SimTime> {
        self.heap.peek().map(|Reverse(p)| p.delivery.time)
    }

    /// Number of pending deliveries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every pending delivery.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
