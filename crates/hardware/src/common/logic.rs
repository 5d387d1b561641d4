//! Nine-valued logic levels and logic vectors.
//!
//! The hosting simulator models every wire with std_logic semantics. This module provides:
//! 1. **`Logic`:** One wire level, ordered exactly as std_logic_1164 so its ordinal can be
//!    compared against encoded mode values.
//! 2. **`LogicVector`:** A bus of up to 64 wires stored as a value plus an "unknown" mask,
//!    which is all the component needs to detect undefined/high-impedance buses and to
//!    slice bit fields out of defined ones.

use std::fmt;

/// A single std_logic level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Logic {
    /// Uninitialized.
    #[default]
    U = 0,
    /// Forcing unknown.
    X = 1,
    /// Forcing 0.
    Zero = 2,
    /// Forcing 1.
    One = 3,
    /// High impedance.
    Z = 4,
    /// Weak unknown.
    W = 5,
    /// Weak 0.
    L = 6,
    /// Weak 1.
    H = 7,
    /// Don't care.
    DontCare = 8,
}

impl Logic {
    /// Returns the std_logic_1164 ordinal of this level.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True only for the forcing levels `0` and `1`.
    #[inline]
    pub const fn is_01(self) -> bool {
        matches!(self, Self::Zero | Self::One)
    }

    /// True for `1` and weak `H`.
    #[inline]
    pub const fn is_high(self) -> bool {
        matches!(self, Self::One | Self::H)
    }

    /// True for `0` and weak `L`.
    #[inline]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Zero | Self::L)
    }

    /// Converts a boolean into a forcing level.
    #[inline]
    pub const fn from_bool(b: bool) -> Self {
        if b { Self::One } else { Self::Zero }
    }

    /// Returns the character used for this level in waveform dumps.
    pub const fn as_char(self) -> char {
        match self {
            Self::U => 'U',
            Self::X => 'X',
            Self::Zero => '0',
            Self::One => '1',
            Self::Z => 'Z',
            Self::W => 'W',
            Self::L => 'L',
            Self::H => 'H',
            Self::DontCare => '-',
        }
    }
}

impl From<bool> for Logic {
    fn from(b: bool) -> Self {
        Self::from_bool(b)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A fixed-width logic bus.
///
/// Bits flagged in `unknown` are treated as U/X/Z; their position in `value` is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LogicVector {
    width: u32,
    value: u64,
    unknown: u64,
}

/// Returns a mask covering the low `width` bits.
#[inline]
const fn mask_for(width: u32) -> u64 {
    if width >= 64 { u64::MAX } else { (1u64 << width) - 1 }
}

impl LogicVector {
    /// Creates a fully defined vector, masking `value` to `width` bits.
    ///
    /// `width` is clamped to 1..=64.
    pub const fn new(width: u32, value: u64) -> Self {
        let width = clamp_width(width);
        Self {
            width,
            value: value & mask_for(width),
            unknown: 0,
        }
    }

    /// Creates a vector whose every bit is `U`.
    pub const fn undefined(width: u32) -> Self {
        let width = clamp_width(width);
        Self {
            width,
            value: 0,
            unknown: mask_for(width),
        }
    }

    /// Creates a vector from explicit value and unknown masks.
    pub const fn with_unknown(width: u32, value: u64, unknown: u64) -> Self {
        let width = clamp_width(width);
        let mask = mask_for(width);
        let unknown = unknown & mask;
        Self {
            width,
            value: value & mask & !unknown,
            unknown,
        }
    }

    /// Builds a vector from individual levels, most significant bit first.
    pub fn from_levels(levels: &[Logic]) -> Self {
        let width = clamp_width(levels.len() as u32);
        let mut value = 0u64;
        let mut unknown = 0u64;
        for level in levels.iter().take(width as usize) {
            value <<= 1;
            unknown <<= 1;
            if level.is_high() {
                value |= 1;
            } else if !level.is_low() {
                unknown |= 1;
            }
        }
        Self {
            width,
            value,
            unknown,
        }
    }

    /// Returns the number of bits.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns a mask covering every bit of this vector.
    #[inline]
    pub const fn bit_mask(&self) -> u64 {
        mask_for(self.width)
    }

    /// True if any bit is undefined, unknown or high impedance.
    #[inline]
    pub const fn has_uxz(&self) -> bool {
        self.unknown != 0
    }

    /// Returns the numeric value, or `None` if any bit is not a clean 0/1.
    #[inline]
    pub const fn value(&self) -> Option<u64> {
        if self.unknown == 0 { Some(self.value) } else { None }
    }

    /// Returns the inclusive bit slice `hi..=lo` as a new vector.
    ///
    /// Out-of-range positions are clamped to the vector width.
    pub const fn subset(&self, hi: u32, lo: u32) -> Self {
        let top = if hi >= self.width { self.width - 1 } else { hi };
        let lo = if lo > top { top } else { lo };
        let width = top - lo + 1;
        let mask = mask_for(width);
        Self {
            width,
            value: (self.value >> lo) & mask,
            unknown: (self.unknown >> lo) & mask,
        }
    }

    /// Returns the level of bit `n` (0 = least significant).
    pub const fn bit(&self, n: u32) -> Logic {
        if n >= self.width || (self.unknown >> n) & 1 == 1 {
            Logic::U
        } else if (self.value >> n) & 1 == 1 {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

#[inline]
const fn clamp_width(width: u32) -> u32 {
    if width == 0 {
        1
    } else if width > 64 {
        64
    } else {
        width
    }
}

impl fmt::Display for LogicVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in (0..self.width).rev() {
            write!(f, "{}", self.bit(n))?;
        }
        Ok(())
    }
}
