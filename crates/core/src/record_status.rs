// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record processing stages and per-stage counts.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Processing stage a harvested record is in.
///
/// The known stages cover what the backend reports today; any other label
/// is kept verbatim in [`RecordStage::Other`] so a new backend stage shows
/// up instead of being lost.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordStage {
    Pending,
    Processing,
    Failure,
    Processed,
    InPreprocessing,
    Other(String),
}

impl RecordStage {
    /// Stages shown as fixed columns, in display order.
    pub const KNOWN: [RecordStage; 5] = [
        RecordStage::Pending,
        RecordStage::Processing,
        RecordStage::Failure,
        RecordStage::Processed,
        RecordStage::InPreprocessing,
    ];

    /// The backend's label for this stage.
    pub fn label(&self) -> &str {
        match self {
            RecordStage::Pending => "pending",
            RecordStage::Processing => "processing",
            RecordStage::Failure => "failure",
            RecordStage::Processed => "processed",
            RecordStage::InPreprocessing => "in preproces",
            RecordStage::Other(label) => label,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "pending" => RecordStage::Pending,
            "processing" => RecordStage::Processing,
            "failure" => RecordStage::Failure,
            "processed" => RecordStage::Processed,
            "in preproces" | "in-preprocessing" | "in_preprocessing" => {
                RecordStage::InPreprocessing
            }
            other => RecordStage::Other(other.to_string()),
        }
    }
}

impl fmt::Display for RecordStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for RecordStage {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl Serialize for RecordStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RecordStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

/// Count of records per processing stage.
///
/// Stages that were never reported read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStatusCounts(BTreeMap<RecordStage, u64>);

impl RecordStatusCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count for `stage`, zero when absent.
    pub fn get(&self, stage: &RecordStage) -> u64 {
        self.0.get(stage).copied().unwrap_or(0)
    }

    pub fn set(&mut self, stage: RecordStage, count: u64) {
        self.0.insert(stage, count);
    }

    /// Whether `stage` carries an explicit value.
    pub fn contains(&self, stage: &RecordStage) -> bool {
        self.0.contains_key(stage)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordStage, u64)> {
        self.0.iter().map(|(stage, count)| (stage, *count))
    }

    pub fn stages(&self) -> impl Iterator<Item = &RecordStage> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Sum over every stage.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Builder-style setter used by event factories and tests.
    pub fn with(mut self, stage: impl Into<RecordStage>, count: u64) -> Self {
        self.set(stage.into(), count);
        self
    }
}

impl FromIterator<(RecordStage, u64)> for RecordStatusCounts {
    fn from_iter<I: IntoIterator<Item = (RecordStage, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, u64)> for RecordStatusCounts {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(label, count)| (RecordStage::from_label(label), count)).collect())
    }
}

#[cfg(test)]
#[path = "record_status_tests.rs"]
mod tests;
