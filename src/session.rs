//! Mixing session state
//!
//! The only state that survives between utterances: which label names which
//! channel, and which names which DCA. One `Session` per logical mixing
//! session; labels are never persisted.

use serde::Serialize;
use std::collections::BTreeMap;

/// Lower-cased label -> 1-based channel or DCA number.
///
/// Ordered so that every pass over the labels (partial matching, context
/// rewriting) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelTable {
    labels: BTreeMap<String, u32>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `label` to `number`.
    ///
    /// A number carries a single label, so any previous label of `number` is
    /// dropped; a label carries a single number, so rebinding moves it.
    pub fn assign(&mut self, label: &str, number: u32) {
        let key = label.trim().to_lowercase();
        if key.is_empty() {
            return;
        }
        self.labels.retain(|_, n| *n != number);
        self.labels.insert(key, number);
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.labels.get(&label.trim().to_lowercase()).copied()
    }

    /// Label currently bound to `number`
    pub fn label_of(&self, number: u32) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, n)| **n == number)
            .map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.labels.iter().map(|(label, n)| (label.as_str(), *n))
    }

    pub fn as_map(&self) -> &BTreeMap<String, u32> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}

/// Label tables for one mixing session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub channel_labels: LabelTable,
    pub dca_labels: LabelTable,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.channel_labels.clear();
        self.dca_labels.clear();
    }
}
