//! Word-Addressed Table Memory.
//!
//! This module implements the storage underneath the prediction table. It provides:
//! 1. **Word:** A tri-state word value, either a defined value or `Undefined`.
//! 2. **Store:** A fixed-width word array with write masking, bulk fills and shadow registers.
//! 3. **Listeners:** Synchronous read/write change notification to registered observers.
//! 4. **Labels:** A sink for symbolic address names found in persistence files.
//! 5. **Codec:** The `ADDRESS:VALUE` hexadecimal text format, both directions.
//! 6. **Loader:** Resolution of resource names to byte streams.

/// `ADDRESS:VALUE` persistence format.
pub mod codec;

/// Symbolic labels attached to addresses.
pub mod labels;

/// Change notification.
pub mod listener;

/// Resource loading.
pub mod loader;

/// The word store.
pub mod store;

use std::fmt;

pub use self::labels::{LabelSink, LabelTable};
pub use self::listener::{ListenerHandle, ListenerSet, MemoryListener};
pub use self::loader::{FsLoader, MemoryLoader, ResourceLoader};
pub use self::store::{AccessShadow, FillPolicy, GeometryPolicy, WordStore};

/// One stored word.
///
/// `Undefined` is a separate state so that every `u64` pattern
/// remains a legal value at any width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Word {
    /// A known value, already masked to the store width.
    Value(u64),
    /// Not yet known.
    #[default]
    Undefined,
}

impl Word {
    /// Returns the value, or `None` if undefined.
    #[inline]
    pub const fn value(self) -> Option<u64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Undefined => None,
        }
    }

    /// True if this word is `Undefined`.
    #[inline]
    pub const fn is_undefined(self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Applies `mask` to a defined value; undefined words are left alone.
    #[inline]
    pub const fn masked(self, mask: u64) -> Self {
        match self {
            Self::Value(v) => Self::Value(v & mask),
            Self::Undefined => Self::Undefined,
        }
    }
}

impl From<u64> for Word {
    fn from(v: u64) -> Self {
        Self::Value(v)
    }
}

impl From<Option<u64>> for Word {
    fn from(v: Option<u64>) -> Self {
        v.map_or(Self::Undefined, Self::Value)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:#x}"),
            Self::Undefined => write!(f, "X"),
        }
    }
}
