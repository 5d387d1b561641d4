//! Prediction Table.
//!
//! A tagged, direct-mapped target table layered on a [`WordStore`]. Once per evaluation
//! step the host calls [`PredictionTable::evaluate`]; the table samples its ports, then
//! runs two independent paths:
//!
//! 1. **Update path:** On a rising edge of *both* the primary clock and the commit clock,
//!    the write-enable code selects COMMIT, PARTIAL or FULL for the row named by bits
//!    4..=11 of the update bus. The store is written and its listeners notified at once.
//! 2. **Lookup path:** The row named by bits 4..=11 of the fetch bus is read and its tag
//!    compared with bits 0..=3. A hit drives the stored status and destination, a miss
//!    drives zeroes. Results become visible `access_latency` after the step.
//!
//! In RESET mode both outputs are driven undefined and nothing is written. Any mode level
//! other than RESET or RUN leaves the step empty.
//!
//! Signal problems (an undefined clock, an undefined update address on a write) are
//! logged and the affected path does nothing.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, error, warn};

use super::encoding::{
    WriteEnable, bus_tag, commit_word, full_invalidate_word, partial_invalidate_word, row_index,
    unpack_word,
};
use super::ports::{Mode, PortId, SignalHost, StepInputs};
use crate::common::constants::{DEST_OUT_BITS, DEST_OUT_SHIFT, STATUS_OUT_BITS};
use crate::common::{CodecError, ConfigError, LogicVector, MemoryError, SimTime};
use crate::config::{ComponentSpec, Config, GeneralConfig};
use crate::memory::codec::{self, ParseReport};
use crate::memory::{LabelSink, ListenerHandle, ResourceLoader, Word, WordStore};
use crate::stats::TableStats;

/// Reference vectors derived from the current geometry.
///
/// Rebuilt after every geometry change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardValues {
    /// Undefined prediction status.
    pub status_undefined: LogicVector,
    /// Undefined prediction destination.
    pub dest_undefined: LogicVector,
    /// Miss status.
    pub status_zero: LogicVector,
    /// Miss destination.
    pub dest_zero: LogicVector,
    /// A whole undefined word of the store width.
    pub word_undefined: LogicVector,
}

impl StandardValues {
    /// Builds the vectors for a store `bit_width` bits wide.
    pub const fn new(bit_width: u32) -> Self {
        Self {
            status_undefined: LogicVector::undefined(STATUS_OUT_BITS),
            dest_undefined: LogicVector::undefined(DEST_OUT_BITS),
            status_zero: LogicVector::new(STATUS_OUT_BITS, 0),
            dest_zero: LogicVector::new(DEST_OUT_BITS, 0),
            word_undefined: LogicVector::undefined(bit_width),
        }
    }
}

/// The pair of values a step drives onto the outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// Value for the status output.
    pub status: LogicVector,
    /// Value for the destination output.
    pub dest: LogicVector,
}

impl Prediction {
    /// Status as a number, `None` if undefined.
    pub const fn status_value(&self) -> Option<u64> {
        self.status.value()
    }

    /// Destination as a number, `None` if undefined.
    pub const fn dest_value(&self) -> Option<u64> {
        self.dest.value()
    }
}

/// Which update a write applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateKind {
    /// Code `11`.
    Commit,
    /// Code `10`.
    InvalidatePartial,
    /// Code `01`.
    InvalidateFull,
}

/// What the update path did in one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write-enable code requested nothing.
    Idle,
    /// A write was requested but the two clock edges did not coincide.
    Suppressed,
    /// A required signal was undefined; nothing was written.
    Skipped,
    /// A row was updated.
    Written {
        /// Update applied.
        kind: UpdateKind,
        /// Row written.
        row: usize,
        /// Word before the write.
        old: Word,
        /// Word after the write.
        new: Word,
    },
}

/// The prediction table component.
pub struct PredictionTable {
    store: WordStore,
    standard: StandardValues,
    stats: TableStats,
    access_latency: SimTime,
    enable_animation: bool,
    version: u32,
    resource: Option<String>,
    labels: Option<Box<dyn LabelSink>>,
}

impl PredictionTable {
    /// Creates a table with the configured geometry, latency and initial contents.
    ///
    /// `config.memory.resource` is not loaded here; see [`PredictionTable::from_config`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::Geometry`] for an unsupported geometry.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut store = WordStore::resizable(config.memory.word_count, config.memory.bit_width)?;
        store.fill(config.memory.init);
        Ok(Self {
            standard: StandardValues::new(store.bit_width()),
            store,
            stats: TableStats::default(),
            access_latency: config.predictor.access_latency(),
            enable_animation: config.general.enable_animation,
            version: ComponentSpec::default().version,
            resource: None,
            labels: None,
        })
    }

    /// Creates a table and loads `config.memory.resource` through `loader`, if set.
    ///
    /// # Errors
    ///
    /// As [`PredictionTable::new`], plus [`ConfigError::Resource`] if the resource cannot
    /// be read.
    pub fn from_config(config: &Config, loader: &dyn ResourceLoader) -> Result<Self, ConfigError> {
        let mut table = Self::new(config)?;
        if let Some(name) = &config.memory.resource {
            let _report = table.load_resource(name, loader)?;
        }
        Ok(table)
    }

    /// The underlying store.
    #[inline]
    pub const fn store(&self) -> &WordStore {
        &self.store
    }

    /// Mutable access to the underlying store, for editors and test setup.
    #[inline]
    pub const fn store_mut(&mut self) -> &mut WordStore {
        &mut self.store
    }

    /// Reference vectors for the current geometry.
    #[inline]
    pub const fn standard_values(&self) -> &StandardValues {
        &self.standard
    }

    /// Counters collected so far.
    #[inline]
    pub const fn stats(&self) -> &TableStats {
        &self.stats
    }

    /// Clears the counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Delay between a step and the visibility of its outputs.
    #[inline]
    pub const fn access_latency(&self) -> SimTime {
        self.access_latency
    }

    /// Sets the access latency.
    pub const fn set_access_latency(&mut self, latency: SimTime) {
        self.access_latency = latency;
    }

    /// Whether an attached viewer should animate accesses.
    #[inline]
    pub const fn enable_animation(&self) -> bool {
        self.enable_animation
    }

    /// Sets the animation flag.
    pub const fn set_enable_animation(&mut self, enable: bool) {
        self.enable_animation = enable;
    }

    /// Sets the animation flag from text; anything starting with `t` is true.
    pub fn set_enable_animation_str(&mut self, s: &str) {
        self.enable_animation = GeneralConfig::parse_flag(s);
    }

    /// Attaches the collaborator that receives `#label` lines during loads.
    pub fn set_label_sink(&mut self, sink: Box<dyn LabelSink>) {
        self.labels = Some(sink);
    }

    /// Detaches and returns the label sink.
    pub fn take_label_sink(&mut self) -> Option<Box<dyn LabelSink>> {
        self.labels.take()
    }

    /// Registers a change listener on the store.
    pub fn add_listener(&mut self, listener: ListenerHandle) {
        self.store.add_listener(listener);
    }

    /// Removes a change listener from the store.
    ///
    /// # Errors
    ///
    /// See [`crate::memory::ListenerSet::remove`].
    pub fn remove_listener(&mut self, listener: &ListenerHandle) -> Result<(), MemoryError> {
        self.store.remove_listener(listener)
    }

    /// Name of the initialization resource, if any.
    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// The stored word at `addr` as a vector of the store width.
    pub fn word_vector(&self, addr: usize) -> LogicVector {
        match self.store.peek(addr) {
            Some(Word::Value(v)) => LogicVector::new(self.store.bit_width(), v),
            _ => self.standard.word_undefined,
        }
    }

    // ── Geometry ────────────────────────────────────────────────

    /// True if no port is attached to a signal.
    pub fn can_change_size<H: SignalHost + ?Sized>(&self, host: &H) -> bool {
        !PortId::ALL.iter().any(|p| host.is_connected(*p))
    }

    /// Changes the geometry, zeroing the table.
    ///
    /// # Errors
    ///
    /// [`MemoryError::FixedGeometry`] while any port is connected, or
    /// [`MemoryError::InvalidGeometry`] for an unsupported geometry.
    pub fn resize<H: SignalHost + ?Sized>(
        &mut self,
        host: &H,
        word_count: usize,
        bit_width: u32,
    ) -> Result<(), MemoryError> {
        if !self.can_change_size(host) {
            return Err(MemoryError::FixedGeometry);
        }
        self.regeometry(word_count, bit_width)
    }

    /// Changes the word count only.
    ///
    /// # Errors
    ///
    /// As [`PredictionTable::resize`].
    pub fn set_size<H: SignalHost + ?Sized>(
        &mut self,
        host: &H,
        word_count: usize,
    ) -> Result<(), MemoryError> {
        self.resize(host, word_count, self.store.bit_width())
    }

    /// Changes the word width only.
    ///
    /// # Errors
    ///
    /// As [`PredictionTable::resize`].
    pub fn set_bit_width<H: SignalHost + ?Sized>(
        &mut self,
        host: &H,
        bit_width: u32,
    ) -> Result<(), MemoryError> {
        self.resize(host, self.store.size(), bit_width)
    }

    fn regeometry(&mut self, word_count: usize, bit_width: u32) -> Result<(), MemoryError> {
        self.store.resize(word_count, bit_width)?;
        self.standard = StandardValues::new(bit_width);
        Ok(())
    }

    // ── Configuration string ────────────────────────────────────

    /// Applies a `version word_count bit_width [resource]` string.
    ///
    /// With a resource the table is zeroed and the resource loaded on top; without one the
    /// table is filled with undefined words. Returns the load report when a resource was
    /// read.
    ///
    /// # Errors
    ///
    /// A malformed string or unsupported geometry leaves the table untouched. An unreadable
    /// resource leaves the new, zeroed geometry in place.
    pub fn initialize(
        &mut self,
        s: &str,
        loader: &dyn ResourceLoader,
    ) -> Result<Option<ParseReport>, ConfigError> {
        let parsed = s.parse::<ComponentSpec>().inspect_err(|e| {
            error!(input = s, "malformed configuration string: {e}");
        })?;
        self.regeometry(parsed.word_count, parsed.bit_width)
            .inspect_err(|e| error!(input = s, "{e}"))?;
        self.version = parsed.version;
        self.resource = parsed.resource;

        match self.resource.clone() {
            Some(name) => self.load_resource(&name, loader).map(Some),
            None => {
                self.store.fill(crate::memory::FillPolicy::Undefined);
                Ok(None)
            }
        }
    }

    /// Renders the configuration string for this instance.
    pub fn serialize(&self) -> String {
        ComponentSpec {
            version: self.version,
            word_count: self.store.size(),
            bit_width: self.store.bit_width(),
            resource: self.resource.clone(),
        }
        .to_string()
    }

    // ── Persistence ─────────────────────────────────────────────

    /// Loads records over the current contents.
    ///
    /// # Errors
    ///
    /// Only reader failures; see [`codec::parse`].
    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<ParseReport, CodecError> {
        match self.labels.as_deref_mut() {
            Some(sink) => codec::parse(reader, &mut self.store, Some(sink)),
            None => codec::parse(reader, &mut self.store, None),
        }
    }

    /// Opens `name` through `loader` and loads it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Resource`] if the resource cannot be opened or read.
    pub fn load_resource(
        &mut self,
        name: &str,
        loader: &dyn ResourceLoader,
    ) -> Result<ParseReport, ConfigError> {
        let resource_err = |source: CodecError| {
            error!(resource = name, "couldn't read from resource: {source}");
            ConfigError::Resource {
                name: name.to_string(),
                source,
            }
        };
        let reader = loader.open(name).map_err(|e| resource_err(e.into()))?;
        self.load(reader).map_err(resource_err)
    }

    /// Writes the table in file format.
    ///
    /// # Errors
    ///
    /// Propagates failures of `writer`.
    pub fn save<W: Write>(&self, writer: W) -> std::io::Result<()> {
        codec::save(&self.store, writer)
    }

    // ── Simulation ──────────────────────────────────────────────

    /// Drives both outputs undefined at time zero.
    pub fn elaborate<H: SignalHost + ?Sized>(&self, host: &mut H) {
        self.drive(host, self.undefined_prediction(), SimTime::ZERO);
    }

    /// Runs one evaluation step.
    pub fn evaluate<H: SignalHost + ?Sized>(&mut self, host: &mut H) {
        let inputs = StepInputs::sample(host);
        let due = inputs.now + self.access_latency;

        match inputs.mode() {
            Mode::Reset => {
                self.stats.resets += 1;
                debug!(time = %inputs.now, "reset: outputs undefined");
                self.drive(host, self.undefined_prediction(), due);
            }
            Mode::Run => {
                self.stats.steps_run += 1;
                let outcome = self.apply_write(&inputs);
                debug!(time = %inputs.now, ?outcome, "update path");
                let prediction = self.lookup(&inputs);
                self.drive(host, prediction, due);
            }
            Mode::Quiescent => {
                self.stats.steps_quiescent += 1;
                debug!(time = %inputs.now, mode = %inputs.mode, "mode neither reset nor run, step ignored");
            }
        }
    }

    /// The update path of one RUN-mode step.
    pub fn apply_write(&mut self, inputs: &StepInputs) -> WriteOutcome {
        if !inputs.clock.is_01() {
            self.warn_skip("CLK undefined: data loss would occur! Ignoring...");
            return WriteOutcome::Skipped;
        }

        let kind = match WriteEnable::decode(&inputs.write_enable) {
            WriteEnable::Idle => return WriteOutcome::Idle,
            WriteEnable::Commit => UpdateKind::Commit,
            WriteEnable::InvalidatePartial => UpdateKind::InvalidatePartial,
            WriteEnable::InvalidateFull => UpdateKind::InvalidateFull,
        };

        if !inputs.write_gate_open() {
            self.stats.suppressed_writes += 1;
            return WriteOutcome::Suppressed;
        }

        let Some(row) = row_index(&inputs.update) else {
            self.warn_skip("update address undefined: data loss would occur! Ignoring...");
            return WriteOutcome::Skipped;
        };
        let Some(old) = self.store.fetch_for_update(row) else {
            self.warn_skip("update row outside the table, write ignored");
            return WriteOutcome::Skipped;
        };

        let new = match kind {
            UpdateKind::Commit => {
                let (Some(tag), Some(dest)) = (bus_tag(&inputs.update), inputs.dest.value())
                else {
                    self.warn_skip("update destination undefined: data loss would occur! Ignoring...");
                    return WriteOutcome::Skipped;
                };
                self.stats.commits += 1;
                Word::Value(commit_word(tag, dest as u16))
            }
            UpdateKind::InvalidatePartial => {
                self.stats.partial_invalidates += 1;
                // An undefined entry stays undefined.
                old.value().map(partial_invalidate_word).into()
            }
            UpdateKind::InvalidateFull => {
                self.stats.full_invalidates += 1;
                Word::Value(full_invalidate_word())
            }
        };

        self.store.write(row, new);
        WriteOutcome::Written {
            kind,
            row,
            old,
            new: self.store.peek(row).unwrap_or(new),
        }
    }

    /// The lookup path of one RUN-mode step.
    pub fn lookup(&mut self, inputs: &StepInputs) -> Prediction {
        let (Some(row), Some(cmp_tag)) = (row_index(&inputs.fetch), bus_tag(&inputs.fetch)) else {
            self.stats.undefined_lookups += 1;
            return self.undefined_prediction();
        };

        let word = match self.store.read(row) {
            Ok(Word::Value(w)) => w,
            Ok(Word::Undefined) => {
                self.stats.lookups += 1;
                self.stats.misses += 1;
                debug!(row, tag = cmp_tag, "lookup of undefined entry, miss");
                return self.zero_prediction();
            }
            Err(e) => {
                self.stats.warnings += 1;
                self.stats.undefined_lookups += 1;
                warn!(row, "lookup ignored: {e}");
                return self.undefined_prediction();
            }
        };

        self.stats.lookups += 1;
        let fields = unpack_word(word);
        if fields.tag == cmp_tag {
            self.stats.hits += 1;
            debug!(row, tag = cmp_tag, status = fields.status, "lookup hit");
            Prediction {
                status: LogicVector::new(STATUS_OUT_BITS, u64::from(fields.status)),
                dest: LogicVector::new(DEST_OUT_BITS, u64::from(fields.dest) << DEST_OUT_SHIFT),
            }
        } else {
            self.stats.misses += 1;
            debug!(row, tag = cmp_tag, stored = fields.tag, "lookup miss");
            self.zero_prediction()
        }
    }

    const fn zero_prediction(&self) -> Prediction {
        Prediction {
            status: self.standard.status_zero,
            dest: self.standard.dest_zero,
        }
    }

    const fn undefined_prediction(&self) -> Prediction {
        Prediction {
            status: self.standard.status_undefined,
            dest: self.standard.dest_undefined,
        }
    }

    fn drive<H: SignalHost + ?Sized>(&self, host: &mut H, prediction: Prediction, time: SimTime) {
        host.deliver(PortId::PredStatus, prediction.status, time);
        host.deliver(PortId::PredDest, prediction.dest, time);
    }

    fn warn_skip(&mut self, msg: &str) {
        self.stats.warnings += 1;
        self.stats.skipped_writes += 1;
        warn!("{msg}");
    }
}

impl fmt::Debug for PredictionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionTable")
            .field("store", &self.store)
            .field("access_latency", &self.access_latency)
            .field("enable_animation", &self.enable_animation)
            .field("version", &self.version)
            .field("resource", &self.resource)
            .field("labels", &self.labels.is_some())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PredictionTable {
    /// Tooltip text: geometry and the last accesses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PredictionTable")?;
        write!(f, "{}", self.store)
    }
}
