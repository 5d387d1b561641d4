//! Address Labels.
//!
//! Persistence files may carry `#label ADDRESS NAME` lines. When a collaborator such as a
//! disassembler is attached, the codec hands each label to it; otherwise the lines are
//! ignored like any other comment.

use std::collections::BTreeMap;

/// Receiver of symbolic address names.
pub trait LabelSink {
    /// Registers `name` for `addr`.
    fn add_label(&mut self, addr: u64, name: &str);
}

/// Ordered label table, the default [`LabelSink`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: BTreeMap<u64, String>,
}

impl LabelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label at `addr`, if any.
    pub fn get(&self, addr: u64) -> Option<&str> {
        self.labels.get(&addr).map(String::as_str)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if no label was registered.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.labels.iter().map(|(a, n)| (*a, n.as_str()))
    }
}

impl LabelSink for LabelTable {
    /// A later label for the same address replaces the earlier one.
    fn add_label(&mut self, addr: u64, name: &str) {
        drop(self.labels.insert(addr, name.to_string()));
    }
}
