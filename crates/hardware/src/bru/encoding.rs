//! Predictor Word Encoding.
//!
//! Each table row is one 18-bit word:
//!
//! ```text
//!  17 16 | 15    12 | 11                     0
//! status |   tag    |      destination
//! ```
//!
//! Status `0b11` is a valid, committed row and `0` is invalid; other values only appear
//! as leftovers of partial invalidation. The update policies are kept as pure functions
//! over raw words so each can be checked in isolation.

use crate::common::LogicVector;
use crate::common::constants::{
    BUS_TAG_HI, DEST_MASK, PARTIAL_LOW_BITS, ROW_HI, ROW_LO, STATUS_MASK, STATUS_SHIFT,
    STATUS_VALID, TAG_DEST_MASK, TAG_MASK, TAG_SHIFT,
};

/// The unpacked fields of a table word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PredictorWord {
    /// 2-bit status.
    pub status: u8,
    /// 4-bit branch tag.
    pub tag: u8,
    /// 12-bit destination fragment.
    pub dest: u16,
}

impl PredictorWord {
    /// True for a valid, committed row.
    pub const fn is_valid(&self) -> bool {
        self.status == STATUS_VALID
    }
}

/// Packs the three fields into a word. Each field is masked to its width.
#[inline]
pub const fn pack_word(status: u8, tag: u8, dest: u16) -> u64 {
    ((status as u64 & STATUS_MASK) << STATUS_SHIFT)
        | ((tag as u64 & TAG_MASK) << TAG_SHIFT)
        | (dest as u64 & DEST_MASK)
}

/// Splits a word into its fields. Bits above 17 are ignored.
#[inline]
pub const fn unpack_word(word: u64) -> PredictorWord {
    PredictorWord {
        status: ((word >> STATUS_SHIFT) & STATUS_MASK) as u8,
        tag: ((word >> TAG_SHIFT) & TAG_MASK) as u8,
        dest: (word & DEST_MASK) as u16,
    }
}

/// COMMIT: a valid row holding `tag` and `dest`, replacing whatever was there.
#[inline]
pub const fn commit_word(tag: u8, dest: u16) -> u64 {
    pack_word(STATUS_VALID, tag, dest)
}

/// PARTIAL invalidation: `0b10 | (old & 0xFFFF)`.
///
/// The status bits are dropped and bit 1 of the low half is forced on. The constant lands
/// in the destination field, not the status field.
///
/// Only defined words pass through here. The table keeps an undefined word undefined
/// rather than treating it as all ones, which would store `0xFFFF`.
#[inline]
pub const fn partial_invalidate_word(old: u64) -> u64 {
    PARTIAL_LOW_BITS | (old & TAG_DEST_MASK)
}

/// FULL invalidation: status, tag and destination all cleared.
#[inline]
pub const fn full_invalidate_word() -> u64 {
    0
}

/// Row selected by an address bus: bits 4..=11.
///
/// `None` if any of those bits is undefined.
#[inline]
pub fn row_index(bus: &LogicVector) -> Option<usize> {
    bus.subset(ROW_HI, ROW_LO).value().map(|v| v as usize)
}

/// Tag carried by an address bus: bits 0..=3, or `None` if undefined.
#[inline]
pub fn bus_tag(bus: &LogicVector) -> Option<u8> {
    bus.subset(BUS_TAG_HI, 0).value().map(|v| v as u8)
}

/// Decoded 2-bit write-enable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteEnable {
    /// `00` or an undefined code: no mutation.
    Idle,
    /// `01`: clear the whole row.
    InvalidateFull,
    /// `10`: drop the status bits, keep tag and destination.
    InvalidatePartial,
    /// `11`: write a valid row.
    Commit,
}

impl WriteEnable {
    /// Decodes the code on the write-enable bus.
    pub fn decode(code: &LogicVector) -> Self {
        match code.value() {
            Some(0b11) => Self::Commit,
            Some(0b10) => Self::InvalidatePartial,
            Some(0b01) => Self::InvalidateFull,
            _ => Self::Idle,
        }
    }
}
