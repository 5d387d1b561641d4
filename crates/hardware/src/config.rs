//! Configuration system for the prediction table.
//!
//! This module defines how the component is parameterized. It provides:
//! 1. **Defaults:** Baseline geometry and timing constants.
//! 2. **Structures:** Hierarchical, serde-deserializable configuration (general, memory, predictor).
//! 3. **Component string:** The compact `version word_count bit_width [resource]` form that
//!    a design file stores for each instance, with its inverse.
//!
//! Structured configuration is read from JSON; use `Config::default()` when none is supplied.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::common::constants::{ACCESS_LATENCY_NS, DEFAULT_WORD_COUNT, MAX_BIT_WIDTH, WORD_BITS};
use crate::common::{ConfigError, MemoryError, SimTime, mangle};
use crate::memory::FillPolicy;

/// Default configuration constants.
mod defaults {
    use super::{ACCESS_LATENCY_NS, DEFAULT_WORD_COUNT, WORD_BITS};

    /// Default number of rows (every row the 8-bit index window can reach).
    pub const WORD_COUNT: usize = DEFAULT_WORD_COUNT;

    /// Default word width (the packed status/tag/destination word).
    pub const BIT_WIDTH: u32 = WORD_BITS;

    /// Default access latency in nanoseconds.
    pub const ACCESS_LATENCY: u64 = ACCESS_LATENCY_NS;

    /// Version number written into new component strings.
    pub const VERSION: u32 = 1001;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use predtab_core::config::Config;
/// use predtab_core::memory::FillPolicy;
///
/// let json = r#"{
///     "memory": { "word_count": 64, "init": "Undefined" },
///     "predictor": { "access_latency_ns": 10 }
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.memory.word_count, 64);
/// assert_eq!(config.memory.bit_width, 18);
/// assert_eq!(config.memory.init, FillPolicy::Undefined);
/// assert_eq!(config.predictor.access_latency_ns, 10);
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Presentation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Table geometry and initial contents.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Predictor timing.
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed JSON, [`ConfigError::Geometry`] for an
    /// unsupported geometry.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the geometry is supported.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Geometry`] if `word_count` is zero or `bit_width` is outside 1..=63.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.memory;
        if m.word_count == 0 || m.bit_width == 0 || m.bit_width > MAX_BIT_WIDTH {
            return Err(ConfigError::Geometry(MemoryError::InvalidGeometry {
                word_count: m.word_count,
                bit_width: m.bit_width,
            }));
        }
        Ok(())
    }
}

/// Presentation settings.
///
/// Nothing here changes simulation results.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Animate table accesses in an attached viewer.
    #[serde(default)]
    pub enable_animation: bool,
}

impl GeneralConfig {
    /// Parses a textual flag: anything starting with `t` (any case) is true.
    pub fn parse_flag(s: &str) -> bool {
        s.trim().to_ascii_lowercase().starts_with('t')
    }
}

/// Table geometry and initialization.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MemoryConfig {
    /// Number of words.
    #[serde(default = "MemoryConfig::default_word_count")]
    pub word_count: usize,

    /// Width of each word in bits.
    #[serde(default = "MemoryConfig::default_bit_width")]
    pub bit_width: u32,

    /// Initial contents when no resource is given.
    #[serde(default)]
    pub init: FillPolicy,

    /// Memory file loaded after the fill, if any.
    #[serde(default)]
    pub resource: Option<String>,
}

impl MemoryConfig {
    const fn default_word_count() -> usize {
        defaults::WORD_COUNT
    }

    const fn default_bit_width() -> u32 {
        defaults::BIT_WIDTH
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            word_count: defaults::WORD_COUNT,
            bit_width: defaults::BIT_WIDTH,
            init: FillPolicy::default(),
            resource: None,
        }
    }
}

/// Predictor timing.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PredictorConfig {
    /// Delay between a lookup and the visibility of its result, in nanoseconds.
    #[serde(default = "PredictorConfig::default_access_latency")]
    pub access_latency_ns: u64,
}

impl PredictorConfig {
    const fn default_access_latency() -> u64 {
        defaults::ACCESS_LATENCY
    }

    /// The access latency as simulated time.
    pub const fn access_latency(&self) -> SimTime {
        SimTime::from_ns(self.access_latency_ns)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            access_latency_ns: defaults::ACCESS_LATENCY,
        }
    }
}

/// The per-instance configuration string: `version word_count bit_width [resource]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    /// Design-file format version.
    pub version: u32,
    /// Number of words.
    pub word_count: usize,
    /// Width of each word in bits.
    pub bit_width: u32,
    /// Initialization resource, already unescaped.
    pub resource: Option<String>,
}

impl Default for ComponentSpec {
    fn default() -> Self {
        Self {
            version: defaults::VERSION,
            word_count: defaults::WORD_COUNT,
            bit_width: defaults::BIT_WIDTH,
            resource: None,
        }
    }
}

fn number<T: FromStr>(field: &'static str, token: Option<&str>) -> Result<T, ConfigError> {
    let token = token.ok_or(ConfigError::MissingField(field))?;
    token.parse().map_err(|_| ConfigError::BadNumber {
        field,
        token: token.to_string(),
    })
}

impl FromStr for ComponentSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut it = s.split_whitespace();
        let version = number("version", it.next())?;
        let word_count = number("word_count", it.next())?;
        let bit_width = number("bit_width", it.next())?;
        let resource = it.next().map(mangle::decode).transpose()?;
        Ok(Self {
            version,
            word_count,
            bit_width,
            resource,
        })
    }
}

impl fmt::Display for ComponentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.version, self.word_count, self.bit_width)?;
        if let Some(name) = &self.resource {
            write!(f, " {}", mangle::encode(name))?;
        }
        Ok(())
    }
}
