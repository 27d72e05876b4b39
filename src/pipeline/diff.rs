//! Diff calculation between the current poll and the stored snapshot.
//!
//! Only additions matter: a record is new when no structurally equal record
//! exists in the previous snapshot. Records that disappeared from the page
//! are not reported.

use std::collections::HashSet;

use crate::models::{ComplaintRecord, Snapshot};

/// Records from the current poll that were absent from the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// New records, in the order they appeared on the page
    pub new_records: Vec<ComplaintRecord>,
}

impl DiffResult {
    /// Check if there are any new records.
    pub fn has_changes(&self) -> bool {
        !self.new_records.is_empty()
    }

    pub fn new_count(&self) -> usize {
        self.new_records.len()
    }

    /// Distinct categories among new records, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.new_records
            .iter()
            .map(|r| r.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Calculate which current records are missing from the previous snapshot.
///
/// Duplicates within `current` are kept as-is; each one is checked against
/// `previous` independently.
pub fn calculate_diff(current: &[ComplaintRecord], previous: &Snapshot) -> DiffResult {
    let known = previous.membership();

    let new_records = current
        .iter()
        .filter(|record| !known.contains(record))
        .cloned()
        .collect();

    DiffResult { new_records }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(category: &str, zip: &str) -> ComplaintRecord {
        ComplaintRecord::new(category, zip)
    }

    #[test]
    fn test_no_changes() {
        let current = vec![rec("Noise", "10001"), rec("Parking", "10002")];
        let previous = Snapshot::new(current.clone());

        let result = calculate_diff(&current, &previous);
        assert!(!result.has_changes());
        assert_eq!(result.new_count(), 0);
    }

    #[test]
    fn test_additions() {
        let previous = Snapshot::new(vec![rec("Noise", "10001")]);
        let current = vec![
            rec("Graffiti", "10003"),
            rec("Noise", "10001"),
            rec("Parking", "10002"),
        ];

        let result = calculate_diff(&current, &previous);
        assert_eq!(
            result.new_records,
            vec![rec("Graffiti", "10003"), rec("Parking", "10002")]
        );
    }

    #[test]
    fn test_removals_are_not_reported() {
        let previous = Snapshot::new(vec![rec("Noise", "10001"), rec("Parking", "10002")]);
        let current = vec![rec("Noise", "10001")];

        assert!(!calculate_diff(&current, &previous).has_changes());
    }

    #[test]
    fn test_same_category_different_zip_is_new() {
        let previous = Snapshot::new(vec![rec("Noise", "10001")]);
        let current = vec![rec("Noise", "10002")];

        assert_eq!(calculate_diff(&current, &previous).new_count(), 1);
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let previous = Snapshot::new(vec![rec("Noise", "10001")]);
        let current = vec![rec("NOISE", "10001")];

        assert_eq!(calculate_diff(&current, &previous).new_count(), 1);
    }

    #[test]
    fn test_duplicates_in_current_reported_twice() {
        let previous = Snapshot::empty();
        let current = vec![rec("Noise", "10001"), rec("Noise", "10001")];

        let result = calculate_diff(&current, &previous);
        assert_eq!(result.new_count(), 2);
        assert_eq!(result.categories(), vec!["Noise"]);
    }

    #[test]
    fn test_duplicates_in_current_suppressed_by_snapshot() {
        let previous = Snapshot::new(vec![rec("Noise", "10001")]);
        let current = vec![rec("Noise", "10001"), rec("Noise", "10001")];

        assert!(!calculate_diff(&current, &previous).has_changes());
    }

    #[test]
    fn test_empty_to_full() {
        let current = vec![rec("Noise", "10001")];

        let result = calculate_diff(&current, &Snapshot::empty());
        assert_eq!(result.new_records, current);
    }

    #[test]
    fn test_full_to_empty() {
        let previous = Snapshot::new(vec![rec("Noise", "10001")]);

        assert!(!calculate_diff(&[], &previous).has_changes());
    }

    #[test]
    fn test_order_follows_current() {
        let previous = Snapshot::new(vec![rec("B", "00002")]);
        let current = vec![
            rec("D", "00004"),
            rec("B", "00002"),
            rec("A", "00001"),
            rec("C", "00003"),
        ];

        let result = calculate_diff(&current, &previous);
        let zips: Vec<&str> = result.new_records.iter().map(|r| r.zip.as_str()).collect();
        assert_eq!(zips, vec!["00004", "00001", "00003"]);
        assert_eq!(result.categories(), vec!["D", "A", "C"]);
    }
}
