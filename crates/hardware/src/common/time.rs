//! Simulated Time.
//!
//! Time in the hosting simulator is a monotonically increasing quantity owned by its
//! event queue. This module gives it a strong type so that latencies and absolute
//! timestamps are never confused with bus values.

use std::fmt;
use std::ops::Add;

/// Picoseconds per nanosecond.
const PS_PER_NS: u64 = 1_000;

/// A point (or span) of simulated time, in picoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimTime(pub u64);

impl SimTime {
    /// The start of simulation.
    pub const ZERO: Self = Self(0);

    /// Creates a time value from nanoseconds, saturating at `u64::MAX` picoseconds.
    #[inline]
    pub const fn from_ns(ns: u64) -> Self {
        Self(ns.saturating_mul(PS_PER_NS))
    }

    /// Creates a time value from picoseconds.
    #[inline]
    pub const fn from_ps(ps: u64) -> Self {
        Self(ps)
    }

    /// Returns the time in whole nanoseconds (truncating).
    #[inline]
    pub const fn as_ns(self) -> u64 {
        self.0 / PS_PER_NS
    }

    /// Returns the raw picosecond count.
    #[inline]
    pub const fn as_ps(self) -> u64 {
        self.0
    }
}

impl Add for SimTime {
    type Output = Self;

    /// Saturates at `u64::MAX` picoseconds.
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % PS_PER_NS == 0 {
            write!(f, "{} ns", self.as_ns())
        } else {
            write!(f, "{} ps", self.0)
        }
    }
}
