//! Projection of matching records into output lines
//!
//! Deduplication state lives in [`UniqueLines`], owned by whoever drives the
//! output loop.

use crate::source::Record;
use std::collections::HashSet;

/// Separator placed between projected values
pub const FIELD_SEPARATOR: &str = ", ";

/// Join the selected fields of a record, in order. Missing fields print as empty.
pub fn project(record: &Record, fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| record.get(field).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

/// Remembers emitted lines so repeats can be suppressed
#[derive(Debug, Default)]
pub struct UniqueLines {
    seen: HashSet<String>,
}

impl UniqueLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time a line is offered, false for every repeat
    pub fn admit(&mut self, line: &str) -> bool {
        if self.seen.contains(line) {
            return false;
        }
        self.seen.insert(line.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_project_in_requested_order() {
        let record = Record::from_pairs([("Company", "Kalle"), ("City", "Boras")]);
        assert_eq!(
            project(&record, &fields(&["City", "Company"])),
            "Boras, Kalle"
        );
    }

    #[test]
    fn test_project_missing_field_is_empty() {
        let record = Record::from_pairs([("Company", "Kalle")]);
        assert_eq!(
            project(&record, &fields(&["Company", "City", "Company"])),
            "Kalle, , Kalle"
        );
        assert_eq!(project(&record, &[]), "");
    }

    #[test]
    fn test_project_is_repeatable() {
        let record = Record::from_pairs([("Company", "Kalle"), ("City", "Boras")]);
        let selection = fields(&["Company", "City"]);
        assert_eq!(project(&record, &selection), project(&record, &selection));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_order() {
        let mut tracker = UniqueLines::new();
        let kept: Vec<&str> = ["a", "a", "b", "a"]
            .into_iter()
            .filter(|line| tracker.admit(line))
            .collect();
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let mut tracker = UniqueLines::new();
        assert!(tracker.admit("Boras"));
        assert!(tracker.admit("boras"));
        assert!(!tracker.admit("Boras"));
        assert_eq!(tracker.len(), 2);
    }
}
