//! Persistence Codec.
//!
//! Reads and writes the line-oriented memory file format:
//!
//! ```text
//! # comment
//! ; comment
//! #label 0010 loop_head
//! 0000:390ab
//! 0001 XXXXX
//! ```
//!
//! Each record is `ADDRESS:VALUE` in hexadecimal; space, tab and `:` all separate tokens.
//! A value token containing `X` stores [`Word::Undefined`]. Lines with fewer than two
//! tokens are skipped. A malformed line is reported and skipped; the load carries on
//! and the store ends up partially initialized rather than rejected.

use std::io::{BufRead, Write};

use tracing::{debug, error};

use super::Word;
use super::labels::LabelSink;
use super::store::WordStore;
use crate::common::CodecError;
use crate::common::constants::ADDRESS_HEX_DIGITS;

/// Characters that separate tokens on a record line.
const SEPARATORS: [char; 3] = [' ', '\t', ':'];

/// Outcome of a load.
#[derive(Debug, Default)]
pub struct ParseReport {
    /// Lines read, including comments and blanks.
    pub lines: usize,
    /// Records stored into the memory. Records addressed past the end are dropped by
    /// the store and not counted.
    pub records: usize,
    /// Labels handed to the label sink.
    pub labels: usize,
    /// Per-line errors, in file order. Each offending line was skipped.
    pub errors: Vec<CodecError>,
}

impl ParseReport {
    /// True if every line was understood.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split(SEPARATORS).filter(|t| !t.is_empty())
}

/// Parses one record line into `(address, word)`.
fn parse_record(line_no: usize, line: &str) -> Result<Option<(usize, Word)>, CodecError> {
    let mut it = tokens(line);
    let (Some(addr_tok), Some(value_tok)) = (it.next(), it.next()) else {
        return Ok(None);
    };

    let addr = usize::from_str_radix(addr_tok, 16).map_err(|_| CodecError::BadAddress {
        line: line_no,
        token: addr_tok.to_string(),
    })?;

    let word = if value_tok.contains('X') {
        Word::Undefined
    } else {
        let v = u64::from_str_radix(value_tok, 16).map_err(|_| CodecError::BadValue {
            line: line_no,
            token: value_tok.to_string(),
        })?;
        Word::Value(v)
    };
    Ok(Some((addr, word)))
}

/// Parses a `#label ADDRESS NAME` line.
fn parse_label(line_no: usize, line: &str) -> Result<(u64, &str), CodecError> {
    let mut it = tokens(line).skip(1);
    let bad = || CodecError::BadLabel { line: line_no };
    let addr = it.next().ok_or_else(bad)?;
    let name = it.next().ok_or_else(bad)?;
    let addr = u64::from_str_radix(addr, 16).map_err(|_| bad())?;
    Ok((addr, name))
}

/// Loads records from `reader` into `store`.
///
/// Addresses are used as given (not masked); values are masked by the store.
/// `#label` lines go to `labels` when one is supplied and are ignored otherwise.
///
/// # Errors
///
/// Only a failure of the reader itself aborts the load. Content errors are logged and
/// returned inside the [`ParseReport`].
pub fn parse<R: BufRead>(
    reader: R,
    store: &mut WordStore,
    mut labels: Option<&mut dyn LabelSink>,
) -> Result<ParseReport, CodecError> {
    let mut report = ParseReport::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        report.lines = line_no;

        let result = if line.starts_with("#label") {
            match labels.as_deref_mut() {
                Some(sink) => parse_label(line_no, &line).map(|(addr, name)| {
                    sink.add_label(addr, name);
                    report.labels += 1;
                }),
                None => Ok(()),
            }
        } else if line.starts_with('#') || line.starts_with(';') {
            Ok(())
        } else {
            parse_record(line_no, &line).map(|record| {
                if let Some((addr, word)) = record {
                    if addr < store.size() {
                        report.records += 1;
                    }
                    store.write(addr, word);
                }
            })
        };

        if let Err(e) = result {
            error!(line = line_no, text = %line, "{e}");
            report.errors.push(e);
        }
    }

    debug!(
        lines = report.lines,
        records = report.records,
        errors = report.errors.len(),
        "memory file parsed"
    );
    Ok(report)
}

/// Convenience wrapper around [`parse`] for in-memory text.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_str(
    text: &str,
    store: &mut WordStore,
    labels: Option<&mut dyn LabelSink>,
) -> Result<ParseReport, CodecError> {
    parse(text.as_bytes(), store, labels)
}

/// Formats one word with `digits` hex digits, or as `X` characters if undefined.
fn hex_word(word: Word, digits: usize) -> String {
    match word {
        Word::Value(v) => format!("{v:0digits$x}"),
        Word::Undefined => "X".repeat(digits),
    }
}

/// Writes every word of `store` in ascending address order.
///
/// # Errors
///
/// Propagates failures of `writer`.
pub fn save<W: Write>(store: &WordStore, mut writer: W) -> std::io::Result<()> {
    let digits = store.hex_digits_per_word();
    for (addr, word) in store.words().iter().enumerate() {
        writeln!(
            writer,
            "{addr:0width$x}:{}",
            hex_word(*word, digits),
            width = ADDRESS_HEX_DIGITS
        )?;
    }
    writer.flush()
}

/// Renders the whole store in file format.
pub fn to_string(store: &WordStore) -> String {
    let digits = store.hex_digits_per_word();
    store
        .words()
        .iter()
        .enumerate()
        .map(|(addr, word)| {
            format!(
                "{addr:0width$x}:{}\n",
                hex_word(*word, digits),
                width = ADDRESS_HEX_DIGITS
            )
        })
        .collect()
}
