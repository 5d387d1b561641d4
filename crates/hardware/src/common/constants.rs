//! Global Table Constants.
//!
//! This module defines the constants shared by the store, the codec and the predictor. It includes:
//! 1. **Word Layout:** Field positions and widths of the packed 18-bit table word.
//! 2. **Bus Layout:** Which bits of a 12-bit address bus select the row and carry the tag.
//! 3. **Port Widths:** Bit widths of every port on the component.
//! 4. **Timing:** The fixed access latency between a lookup and its visible result.

/// Width of a packed predictor word in bits.
pub const WORD_BITS: u32 = 18;

/// Maximum word width supported by the store.
pub const MAX_BIT_WIDTH: u32 = 63;

/// Bit position of the 2-bit status field.
pub const STATUS_SHIFT: u32 = 16;

/// Mask for the 2-bit status field (after shifting).
pub const STATUS_MASK: u64 = 0b11;

/// Bit position of the 4-bit tag field.
pub const TAG_SHIFT: u32 = 12;

/// Mask for the 4-bit tag field (after shifting).
pub const TAG_MASK: u64 = 0xF;

/// Mask for the 12-bit destination field.
pub const DEST_MASK: u64 = 0xFFF;

/// Mask selecting the tag and destination fields together.
pub const TAG_DEST_MASK: u64 = 0xFFFF;

/// Status value of a valid, committed row.
pub const STATUS_VALID: u8 = 0b11;

/// Bits a partial invalidation ORs into the low half of a word (bits 0-1, the
/// destination field).
pub const PARTIAL_LOW_BITS: u64 = 0b10;

/// Lowest bus bit of the row index.
pub const ROW_LO: u32 = 4;

/// Highest bus bit of the row index.
///
/// The index window is fixed at bits 4..=11 of the bus and is not derived
/// from the configured word count.
pub const ROW_HI: u32 = 11;

/// Highest bus bit of the lookup/update tag.
pub const BUS_TAG_HI: u32 = 3;

/// Number of rows reachable through the fixed index window.
pub const INDEXABLE_ROWS: usize = 1 << (ROW_HI - ROW_LO + 1);

/// Width of the fetch, update and destination input buses.
pub const ADDRESS_BUS_BITS: u32 = 12;

/// Width of the prediction status output.
pub const STATUS_OUT_BITS: u32 = 2;

/// Width of the prediction destination output.
///
/// Carries the 12-bit destination shifted left by two.
pub const DEST_OUT_BITS: u32 = 32;

/// Shift applied to the stored destination before it is driven out.
pub const DEST_OUT_SHIFT: u32 = 2;

/// Width of the write-enable code.
pub const WRITE_ENABLE_BITS: u32 = 2;

/// Default access latency in nanoseconds.
pub const ACCESS_LATENCY_NS: u64 = 30;

/// Default number of rows in the table.
pub const DEFAULT_WORD_COUNT: usize = INDEXABLE_ROWS;

/// Number of hex digits used for addresses in the persistence format.
pub const ADDRESS_HEX_DIGITS: usize = 4;
