//! Unique key synthesis for non-unique identifier columns.
//!
//! Singleton values are kept verbatim. Each occurrence of a repeated value
//! becomes `<value>-NN` (two digits, 1-based, row order). Every blank value
//! gets its own placeholder `<PREFIX>-NNNNN` from a counter that advances over
//! blank rows only. Generated keys skip anything already taken, so the output
//! is unique even for adversarial input such as `X`, `X`, `X-01`.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Counts describing how keys were derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyStats {
    /// Distinct non-blank values occurring more than once.
    pub duplicate_groups: usize,
    /// Rows whose key received an ordinal suffix.
    pub suffixed_rows: usize,
    /// Rows whose identifier was blank and received a placeholder.
    pub placeholders: usize,
}

/// Keys in row order plus derivation counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAssignment {
    pub keys: Vec<String>,
    pub stats: KeyStats,
}

/// Derive a unique key for every raw identifier.
///
/// `prefix` is the placeholder prefix for blank identifiers (`FORM`, `SIGA`).
pub fn dedupe_keys(raw: &[String], prefix: &str) -> KeyAssignment {
    let values: Vec<&str> = raw.iter().map(|value| value.trim()).collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values.iter().filter(|value| !value.is_empty()) {
        *counts.entry(*value).or_insert(0) += 1;
    }

    let mut used: HashSet<String> = counts
        .iter()
        .filter(|(_, count)| **count == 1)
        .map(|(value, _)| (*value).to_string())
        .collect();

    let mut stats = KeyStats {
        duplicate_groups: counts.values().filter(|count| **count > 1).count(),
        ..KeyStats::default()
    };
    let mut sequence: HashMap<&str, usize> = HashMap::new();
    let mut placeholder_counter = 0usize;
    let mut keys = Vec::with_capacity(values.len());

    for value in &values {
        if value.is_empty() {
            let key = loop {
                placeholder_counter += 1;
                let candidate = format!("{prefix}-{placeholder_counter:05}");
                if used.insert(candidate.clone()) {
                    break candidate;
                }
            };
            stats.placeholders += 1;
            keys.push(key);
            continue;
        }

        if counts.get(value).copied().unwrap_or(0) <= 1 {
            keys.push((*value).to_string());
            continue;
        }

        let seq = sequence.entry(*value).or_insert(0);
        let key = loop {
            *seq += 1;
            let candidate = format!("{value}-{:02}", *seq);
            if used.insert(candidate.clone()) {
                break candidate;
            }
        };
        stats.suffixed_rows += 1;
        keys.push(key);
    }

    KeyAssignment { keys, stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn test_duplicates_are_suffixed_in_row_order() {
        let assignment = dedupe_keys(&strings(&["X", "X", "Y"]), "FORM");
        assert_eq!(assignment.keys, vec!["X-01", "X-02", "Y"]);
        assert_eq!(assignment.stats.duplicate_groups, 1);
        assert_eq!(assignment.stats.suffixed_rows, 2);
        assert_eq!(assignment.stats.placeholders, 0);
    }

    #[test]
    fn test_blank_rows_get_placeholders() {
        let assignment = dedupe_keys(&strings(&["", " ", ""]), "FORM");
        assert_eq!(assignment.keys, vec!["FORM-00001", "FORM-00002", "FORM-00003"]);
        assert_eq!(assignment.stats.placeholders, 3);
        assert_eq!(assignment.stats.duplicate_groups, 0);
    }

    #[test]
    fn test_placeholder_counter_skips_non_blank_rows() {
        let assignment = dedupe_keys(&strings(&["", "A", "", "B"]), "SIGA");
        assert_eq!(assignment.keys, vec!["SIGA-00001", "A", "SIGA-00002", "B"]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let assignment = dedupe_keys(&strings(&[" 12 ", "12", "13"]), "FORM");
        assert_eq!(assignment.keys, vec!["12-01", "12-02", "13"]);
    }

    #[test]
    fn test_generated_keys_skip_existing_values() {
        let assignment = dedupe_keys(&strings(&["X", "X", "X-01", "FORM-00001", ""]), "FORM");
        assert_eq!(
            assignment.keys,
            vec!["X-02", "X-03", "X-01", "FORM-00001", "FORM-00002"]
        );
    }
}
