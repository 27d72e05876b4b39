// src/services/labels.rs

//! Complaint label parsing.
//!
//! Status page labels look like `"<category> - <address>, <zipcode>"`.
//! The address is dropped; category and ZIP become a [`ComplaintRecord`].

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::ComplaintRecord;

/// Category and address are lazy; the ZIP must end the label.
static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S.*?)\s+-\s+(.*?),\s*([0-9]{5})$").expect("label pattern is valid")
});

/// A label that does not have the `"<category> - <address>, <zip>"` shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No match found for: {label}")]
pub struct NoMatch {
    pub label: String,
}

/// Parse a single raw label into a complaint record.
pub fn parse_label(label: &str) -> Result<ComplaintRecord, NoMatch> {
    let no_match = || NoMatch {
        label: label.to_string(),
    };

    let caps = LABEL_PATTERN.captures(label).ok_or_else(no_match)?;
    let category = caps.get(1).map_or("", |m| m.as_str().trim());
    let zip = caps.get(3).map_or("", |m| m.as_str());

    if category.is_empty() {
        return Err(no_match());
    }

    Ok(ComplaintRecord::new(category, zip))
}

/// Outcome of parsing a batch of labels, both halves in source order.
#[derive(Debug, Default)]
pub struct ParsedLabels {
    pub records: Vec<ComplaintRecord>,
    pub rejected: Vec<NoMatch>,
}

impl ParsedLabels {
    /// Total number of labels seen.
    pub fn total(&self) -> usize {
        self.records.len() + self.rejected.len()
    }
}

/// Parse every label, keeping matches and collecting non-matches.
pub fn parse_labels<I, S>(labels: I) -> ParsedLabels
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = ParsedLabels::default();
    for label in labels {
        match parse_label(label.as_ref()) {
            Ok(record) => parsed.records.push(record),
            Err(no_match) => parsed.rejected.push(no_match),
        }
    }
    parsed
}
