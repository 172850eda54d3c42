//! Pure check primitives
//!
//! Each primitive operates on in-memory string lists and returns a Finding.
//! No I/O, no network awareness, no side effects. Comparison is exact,
//! case-sensitive string equality throughout.

/// Result of a single check: the offending entries in input order, plus the
/// duplicate total for uniqueness checks. An empty finding means the check
/// passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Finding {
    pub entries: Vec<String>,
    pub duplicate_count: usize,
}

impl Finding {
    pub fn failed(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Offending entries joined for error messages
    pub fn entries_list(&self) -> String {
        self.entries.join(", ")
    }
}

/// Every candidate not present in `allowed`, preserving candidate order.
pub fn invalid_entries(candidates: &[String], allowed: &[String]) -> Finding {
    let entries: Vec<String> = candidates
        .iter()
        .filter(|entry| !allowed.contains(entry))
        .cloned()
        .collect();
    Finding {
        entries,
        duplicate_count: 0,
    }
}

/// Every repeat of an earlier element, preserving input order. An element
/// appearing three times contributes both later occurrences.
pub fn duplicate_entries(candidates: &[String]) -> Finding {
    let mut entries = Vec::new();
    for (index, entry) in candidates.iter().enumerate() {
        let first = candidates.iter().position(|e| e == entry);
        if first != Some(index) {
            entries.push(entry.clone());
        }
    }
    let duplicate_count = entries.len();
    Finding {
        entries,
        duplicate_count,
    }
}

/// Every element of `candidates` that also occurs in `excluded`, preserving
/// candidate order.
pub fn overlapping_entries(candidates: &[String], excluded: &[String]) -> Finding {
    let entries: Vec<String> = candidates
        .iter()
        .filter(|entry| excluded.contains(entry))
        .cloned()
        .collect();
    Finding {
        entries,
        duplicate_count: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_invalid_entries_passes_when_all_present() {
        let finding = invalid_entries(&list(&["a", "b"]), &list(&["a", "b", "c"]));
        assert!(!finding.failed());
        assert!(finding.entries.is_empty());
    }

    #[test]
    fn test_invalid_entries_is_ordered_set_difference() {
        let finding = invalid_entries(&list(&["x", "a", "y", "b", "x"]), &list(&["a", "b"]));
        assert!(finding.failed());
        assert_eq!(finding.entries, list(&["x", "y", "x"]));
    }

    #[test]
    fn test_invalid_entries_is_case_sensitive() {
        let finding = invalid_entries(&list(&["BTC_USDT"]), &list(&["btc_usdt"]));
        assert_eq!(finding.entries, list(&["BTC_USDT"]));
    }

    #[test]
    fn test_invalid_entries_empty_candidates_pass() {
        let finding = invalid_entries(&[], &list(&["a"]));
        assert!(!finding.failed());
    }

    #[test]
    fn test_duplicate_entries_counts_non_first_occurrences() {
        let finding = duplicate_entries(&list(&["a", "b", "a", "c", "a", "b"]));
        assert!(finding.failed());
        // "a" appears three times and contributes both later occurrences
        assert_eq!(finding.entries, list(&["a", "a", "b"]));
        assert_eq!(finding.duplicate_count, 3);
    }

    #[test]
    fn test_duplicate_count_equals_len_minus_distinct() {
        let input = list(&["a", "b", "a", "c", "a", "b"]);
        let finding = duplicate_entries(&input);
        let distinct: std::collections::HashSet<&String> = input.iter().collect();
        assert_eq!(finding.duplicate_count, input.len() - distinct.len());
    }

    #[test]
    fn test_duplicate_entries_passes_on_unique_input() {
        let finding = duplicate_entries(&list(&["a", "b", "c"]));
        assert!(!finding.failed());
        assert_eq!(finding.duplicate_count, 0);
    }

    #[test]
    fn test_overlapping_entries_lists_intersection_in_candidate_order() {
        let finding = overlapping_entries(&list(&["m1", "m2", "m3"]), &list(&["m3", "m1"]));
        assert!(finding.failed());
        assert_eq!(finding.entries, list(&["m1", "m3"]));
    }

    #[test]
    fn test_overlapping_entries_passes_when_disjoint() {
        let finding = overlapping_entries(&list(&["m1"]), &list(&["m2"]));
        assert!(!finding.failed());
    }

    #[test]
    fn test_prelaunch_scenario_duplicates_and_membership() {
        // Reference set ["BTC_USDT", "ETH_USDT"], config lists BTC_USDT twice
        // and one unknown market.
        let markets = list(&["BTC_USDT", "ETH_USDT"]);
        let prelaunch = list(&["BTC_USDT", "BTC_USDT", "SOL_USDT"]);

        let duplicates = duplicate_entries(&prelaunch);
        assert_eq!(duplicates.entries, list(&["BTC_USDT"]));
        assert_eq!(duplicates.duplicate_count, 1);

        let invalid = invalid_entries(&prelaunch, &markets);
        assert_eq!(invalid.entries, list(&["SOL_USDT"]));
    }
}
