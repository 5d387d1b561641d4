//! Error definitions.
//!
//! This module defines the error taxonomy of the component. It provides:
//! 1. **Memory Errors:** Geometry and addressing failures of the word store, plus listener bookkeeping.
//! 2. **Codec Errors:** Per-line content errors raised while reading a persistence file.
//! 3. **Configuration Errors:** Malformed configuration strings, JSON and unreadable resources.
//!
//! None of these terminate the host. Content errors are collected and skipped, signal errors
//! never reach this module at all (they are logged and the step does nothing).

use thiserror::Error;

/// Failures of the word store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// A read addressed a row outside `0..size`.
    #[error("address {addr:#x} out of range for {size}-word memory")]
    AddressOutOfRange {
        /// The requested address.
        addr: usize,
        /// Number of words in the store.
        size: usize,
    },

    /// The geometry of this store cannot be changed.
    #[error("cannot change the size of a fixed-geometry memory")]
    FixedGeometry,

    /// A word count or bit width outside the supported range.
    #[error("invalid memory geometry: {word_count} words x {bit_width} bits")]
    InvalidGeometry {
        /// Requested number of words.
        word_count: usize,
        /// Requested word width.
        bit_width: u32,
    },

    /// Removal of a listener that was never added.
    #[error("cannot remove unregistered memory listener")]
    ListenerNotRegistered,

    /// Removal requested while no listener is registered at all.
    #[error("no memory listeners registered")]
    NoListeners,
}

/// Errors raised while reading the `ADDRESS:VALUE` text format.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The address token is not hexadecimal.
    #[error("line {line}: bad address '{token}'")]
    BadAddress {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// The value token is neither hexadecimal nor an `X` marker.
    #[error("line {line}: bad value '{token}'")]
    BadValue {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A `#label` line without a hexadecimal address and a name.
    #[error("line {line}: malformed #label line")]
    BadLabel {
        /// 1-based line number.
        line: usize,
    },

    /// The underlying reader failed; this aborts the load.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Returns the line a content error refers to, if any.
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::BadAddress { line, .. } | Self::BadValue { line, .. } | Self::BadLabel { line } => {
                Some(*line)
            }
            Self::Io(_) => None,
        }
    }
}

/// Errors raised while configuring the component.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required token of the configuration string is absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A numeric token failed to parse.
    #[error("bad number for '{field}': '{token}'")]
    BadNumber {
        /// Field being parsed.
        field: &'static str,
        /// Offending token.
        token: String,
    },

    /// A resource name contains a malformed `\uXXXX` escape.
    #[error("bad escape sequence in '{0}'")]
    BadEscape(String),

    /// The requested geometry is not supported.
    #[error(transparent)]
    Geometry(#[from] MemoryError),

    /// The initialization resource could not be opened or read.
    #[error("cannot read resource '{name}': {source}")]
    Resource {
        /// Resource name as given in the configuration.
        name: String,
        /// Underlying failure.
        #[source]
        source: CodecError,
    },

    /// Structured configuration failed to deserialize.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`MemoryError`].
    #[error(transparent)]
    Memory(#[from] MemoryError),
    /// See [`CodecError`].
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// File access outside the persistence codec.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
