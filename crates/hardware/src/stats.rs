//! Prediction table statistics.
//!
//! This module counts what the table did during a run. It tracks:
//! 1. **Steps:** Evaluations by mode (run, reset, quiescent).
//! 2. **Lookups:** Hits, misses and lookups that produced undefined outputs.
//! 3. **Updates:** Commits, partial and full invalidations.
//! 4. **Degradations:** Writes suppressed for a missing clock edge and writes skipped for
//!    undefined signals, plus the warnings raised along the way.

use std::fmt;

use serde::Serialize;

/// Counters collected by a [`PredictionTable`](crate::bru::PredictionTable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Evaluations in RUN mode.
    pub steps_run: u64,
    /// Evaluations in RESET mode.
    pub resets: u64,
    /// Evaluations with any other mode level.
    pub steps_quiescent: u64,

    /// Lookups that read the table.
    pub lookups: u64,
    /// Lookups whose tag matched.
    pub hits: u64,
    /// Lookups whose tag did not match, including reads of undefined entries.
    pub misses: u64,
    /// Lookups that drove undefined outputs (undefined bus or bad row).
    pub undefined_lookups: u64,

    /// COMMIT writes.
    pub commits: u64,
    /// PARTIAL invalidations.
    pub partial_invalidates: u64,
    /// FULL invalidations.
    pub full_invalidates: u64,

    /// Write requests dropped because both clock edges were not present.
    pub suppressed_writes: u64,
    /// Write requests dropped because a required signal was undefined.
    pub skipped_writes: u64,
    /// Warnings raised.
    pub warnings: u64,
}

impl TableStats {
    /// Tag-match rate over lookups that compared a tag, in percent.
    pub fn hit_rate(&self) -> f64 {
        let compared = self.hits + self.misses;
        if compared == 0 {
            0.0
        } else {
            (self.hits as f64 / compared as f64) * 100.0
        }
    }

    /// Total table mutations.
    pub const fn writes(&self) -> u64 {
        self.commits + self.partial_invalidates + self.full_invalidates
    }

    /// Clears every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "PREDICTION TABLE STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "steps.run                {}", self.steps_run)?;
        writeln!(f, "steps.reset              {}", self.resets)?;
        writeln!(f, "steps.quiescent          {}", self.steps_quiescent)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "LOOKUP")?;
        writeln!(f, "  lookup.total           {}", self.lookups)?;
        writeln!(f, "  lookup.hits            {}", self.hits)?;
        writeln!(f, "  lookup.misses          {}", self.misses)?;
        writeln!(f, "  lookup.undefined       {}", self.undefined_lookups)?;
        writeln!(f, "  lookup.hit_rate        {:.2}%", self.hit_rate())?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "UPDATE")?;
        writeln!(f, "  update.commit          {}", self.commits)?;
        writeln!(f, "  update.partial         {}", self.partial_invalidates)?;
        writeln!(f, "  update.full            {}", self.full_invalidates)?;
        writeln!(f, "  update.suppressed      {}", self.suppressed_writes)?;
        writeln!(f, "  update.skipped         {}", self.skipped_writes)?;
        writeln!(f, "  warnings               {}", self.warnings)?;
        write!(f, "==========================================================")
    }
}
