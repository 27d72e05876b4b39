//! Complaint record and snapshot data structures.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A complaint extracted from one status page label.
///
/// Records are plain values: two records are the same complaint when both
/// `category` and `zip` match exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ComplaintRecord {
    /// Complaint category as listed on the status page
    pub category: String,

    /// Five-digit ZIP code, kept as text to preserve leading zeros
    pub zip: String,
}

impl ComplaintRecord {
    pub fn new(category: impl Into<String>, zip: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            zip: zip.into(),
        }
    }
}

impl fmt::Display for ComplaintRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category, self.zip)
    }
}

/// The complete record set persisted after the latest change.
///
/// Serializes as a bare JSON array so the state file stays human-readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<ComplaintRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<ComplaintRecord>) -> Self {
        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ComplaintRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComplaintRecord> {
        self.records.iter()
    }

    /// Borrowed membership set for O(1) lookups.
    pub fn membership(&self) -> HashSet<&ComplaintRecord> {
        self.records.iter().collect()
    }

    pub fn into_records(self) -> Vec<ComplaintRecord> {
        self.records
    }
}
