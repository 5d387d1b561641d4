//! Word Store.
//!
//! A word-addressed array of `word_count` words, each `bit_width` (1..=63) bits wide.
//! It performs the following:
//! 1. **Masking:** Every defined value is masked to the configured width on write.
//! 2. **Diagnostics:** The last read and last write are shadowed for tooltips and editors.
//! 3. **Notification:** Reads and writes are reported to the registered [`ListenerSet`].
//! 4. **Initialization:** Bulk fills with zero, undefined or random contents.

use std::fmt;

use rand::Rng;
use tracing::{debug, trace, warn};

use super::Word;
use super::listener::{ListenerHandle, ListenerSet};
use crate::common::MemoryError;
use crate::common::constants::MAX_BIT_WIDTH;

/// Bulk initialization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum FillPolicy {
    /// Every word is `0`.
    #[default]
    Zero,
    /// Every word is [`Word::Undefined`].
    Undefined,
    /// Every word is a random value within the bit mask.
    Random,
}

/// Whether the store geometry may change after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeometryPolicy {
    /// `resize` fails with [`MemoryError::FixedGeometry`].
    #[default]
    Fixed,
    /// `resize` reallocates and zeroes the contents.
    Resizable,
}

/// Last-access shadow registers.
///
/// Purely observational; nothing in the model reads these back. Table updates read the
/// old word through [`WordStore::fetch_for_update`], so a write also moves the read shadow
/// to the updated row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AccessShadow {
    /// Address of the most recent read.
    pub last_read_addr: Option<usize>,
    /// Value returned by the most recent read.
    pub last_read_value: Word,
    /// Address of the most recent write.
    pub last_write_addr: Option<usize>,
    /// Value stored by the most recent write (after masking).
    pub last_write_value: Word,
}

/// The word store.
#[derive(Debug, Clone)]
pub struct WordStore {
    words: Vec<Word>,
    bit_width: u32,
    bit_mask: u64,
    policy: GeometryPolicy,
    shadow: AccessShadow,
    listeners: ListenerSet,
}

/// Returns the mask for a word of `bit_width` bits.
const fn mask_for(bit_width: u32) -> u64 {
    (1u64 << bit_width) - 1
}

/// Validates a geometry request.
const fn check_geometry(word_count: usize, bit_width: u32) -> Result<(), MemoryError> {
    if word_count == 0 || bit_width == 0 || bit_width > MAX_BIT_WIDTH {
        Err(MemoryError::InvalidGeometry {
            word_count,
            bit_width,
        })
    } else {
        Ok(())
    }
}

impl WordStore {
    /// Creates a fixed-geometry store filled with zeroes.
    ///
    /// # Errors
    ///
    /// [`MemoryError::InvalidGeometry`] for a zero word count or a width outside 1..=63.
    pub fn new(word_count: usize, bit_width: u32) -> Result<Self, MemoryError> {
        Self::with_policy(word_count, bit_width, GeometryPolicy::Fixed)
    }

    /// Creates a store whose geometry may later be changed with [`WordStore::resize`].
    ///
    /// # Errors
    ///
    /// [`MemoryError::InvalidGeometry`] for a zero word count or a width outside 1..=63.
    pub fn resizable(word_count: usize, bit_width: u32) -> Result<Self, MemoryError> {
        Self::with_policy(word_count, bit_width, GeometryPolicy::Resizable)
    }

    fn with_policy(
        word_count: usize,
        bit_width: u32,
        policy: GeometryPolicy,
    ) -> Result<Self, MemoryError> {
        check_geometry(word_count, bit_width)?;
        Ok(Self {
            words: vec![Word::Value(0); word_count],
            bit_width,
            bit_mask: mask_for(bit_width),
            policy,
            shadow: AccessShadow::default(),
            listeners: ListenerSet::new(),
        })
    }

    /// Reallocates the store with a new geometry and zeroes it.
    ///
    /// Listeners survive; the shadow registers are cleared.
    ///
    /// # Errors
    ///
    /// [`MemoryError::FixedGeometry`] on a fixed store and
    /// [`MemoryError::InvalidGeometry`] for an unsupported request. The store is
    /// unchanged in both cases.
    pub fn resize(&mut self, word_count: usize, bit_width: u32) -> Result<(), MemoryError> {
        if self.policy == GeometryPolicy::Fixed {
            return Err(MemoryError::FixedGeometry);
        }
        check_geometry(word_count, bit_width)?;
        debug!(word_count, bit_width, "memory reallocated");
        self.words = vec![Word::Value(0); word_count];
        self.bit_width = bit_width;
        self.bit_mask = mask_for(bit_width);
        self.shadow = AccessShadow::default();
        Ok(())
    }

    /// Changes only the word count.
    ///
    /// # Errors
    ///
    /// As [`WordStore::resize`].
    pub fn set_size(&mut self, word_count: usize) -> Result<(), MemoryError> {
        self.resize(word_count, self.bit_width)
    }

    /// Changes only the word width. Setting the current width is a no-op.
    ///
    /// # Errors
    ///
    /// As [`WordStore::resize`].
    pub fn set_bit_width(&mut self, bit_width: u32) -> Result<(), MemoryError> {
        if bit_width == self.bit_width {
            return Ok(());
        }
        self.resize(self.words.len(), bit_width)
    }

    /// Number of words.
    #[inline]
    pub fn size(&self) -> usize {
        self.words.len()
    }

    /// Width of each word in bits.
    #[inline]
    pub const fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// Mask applied to every defined value on write.
    #[inline]
    pub const fn bit_mask(&self) -> u64 {
        self.bit_mask
    }

    /// The geometry policy this store was created with.
    #[inline]
    pub const fn geometry_policy(&self) -> GeometryPolicy {
        self.policy
    }

    /// Hex digits needed to print one word.
    #[inline]
    pub const fn hex_digits_per_word(&self) -> usize {
        self.bit_width.div_ceil(4) as usize
    }

    /// Number of address lines needed to reach every word.
    pub fn address_bus_width(&self) -> u32 {
        let n = self.words.len();
        if n <= 1 { 0 } else { usize::BITS - (n - 1).leading_zeros() }
    }

    /// All words, in address order.
    #[inline]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// The last-access shadow registers.
    #[inline]
    pub const fn shadow(&self) -> &AccessShadow {
        &self.shadow
    }

    /// Reads a word, updating the read shadow and notifying listeners.
    ///
    /// # Errors
    ///
    /// [`MemoryError::AddressOutOfRange`] if `addr >= size()`. Nothing is recorded or
    /// notified in that case.
    pub fn read(&mut self, addr: usize) -> Result<Word, MemoryError> {
        let value = *self.words.get(addr).ok_or(MemoryError::AddressOutOfRange {
            addr,
            size: self.words.len(),
        })?;
        trace!(addr, %value, "memory read");
        self.shadow.last_read_addr = Some(addr);
        self.shadow.last_read_value = value;
        self.listeners.notify_read(addr, value);
        Ok(value)
    }

    /// Reads a word ahead of a read-modify-write.
    ///
    /// The read shadow is updated as for [`read`](Self::read) but listeners are not
    /// notified; the write that follows notifies them with the old and new value.
    /// Returns `None` for an out-of-range address, recording nothing.
    pub fn fetch_for_update(&mut self, addr: usize) -> Option<Word> {
        let value = self.peek(addr)?;
        self.shadow.last_read_addr = Some(addr);
        self.shadow.last_read_value = value;
        Some(value)
    }

    /// Returns a word without touching the shadow or the listeners.
    #[inline]
    pub fn peek(&self, addr: usize) -> Option<Word> {
        self.words.get(addr).copied()
    }

    /// Writes a word, masking defined values to the store width.
    ///
    /// An out-of-range address is reported and ignored.
    pub fn write(&mut self, addr: usize, word: Word) {
        let size = self.words.len();
        let Some(slot) = self.words.get_mut(addr) else {
            warn!(addr, size, "write address out of range, ignored");
            return;
        };
        let new = word.masked(self.bit_mask);
        let old = std::mem::replace(slot, new);
        trace!(addr, %old, %new, "memory write");
        self.shadow.last_write_addr = Some(addr);
        self.shadow.last_write_value = new;
        self.listeners.notify_write(addr, old, new);
    }

    /// True if `addr` is out of range or holds [`Word::Undefined`].
    pub fn is_undefined(&self, addr: usize) -> bool {
        self.words.get(addr).is_none_or(|w| w.is_undefined())
    }

    /// Bulk-initializes every word. Listeners are not notified.
    pub fn fill(&mut self, policy: FillPolicy) {
        match policy {
            FillPolicy::Zero => self.words.fill(Word::Value(0)),
            FillPolicy::Undefined => self.words.fill(Word::Undefined),
            FillPolicy::Random => self.fill_random_with(&mut rand::rng()),
        }
        debug!(?policy, words = self.words.len(), "memory filled");
    }

    /// Fills every word with random values drawn from `rng`, masked to the store width.
    pub fn fill_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mask = self.bit_mask;
        for w in &mut self.words {
            *w = Word::Value(rng.random::<u64>() & mask);
        }
    }

    /// Registers a change listener.
    pub fn add_listener(&mut self, listener: ListenerHandle) {
        self.listeners.add(listener);
    }

    /// Removes every registration of a change listener.
    ///
    /// # Errors
    ///
    /// See [`ListenerSet::remove`].
    pub fn remove_listener(&mut self, listener: &ListenerHandle) -> Result<(), MemoryError> {
        self.listeners.remove(listener)
    }

    /// The registered listeners.
    #[inline]
    pub const fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }
}

impl fmt::Display for WordStore {
    /// Diagnostic summary in the form used by editor tooltips.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = |a: Option<usize>| a.map_or_else(|| "-".to_string(), |a| a.to_string());
        writeln!(f, "[{}x{}]", self.words.len(), self.bit_width)?;
        writeln!(
            f,
            "last read at {} data= {}",
            addr(self.shadow.last_read_addr),
            self.shadow.last_read_value
        )?;
        write!(
            f,
            "last write at {} data= {}",
            addr(self.shadow.last_write_addr),
            self.shadow.last_write_value
        )
    }
}
