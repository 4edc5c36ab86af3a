//! Citation ordering.
//!
//! Rows are ordered by four numeric components taken from the DOI (year,
//! then three parts). A component that is missing or not a plain digit run
//! compares greater than any number, so such rows drift to the end. The
//! sort is stable: equal keys keep their input order.

use std::cmp::Ordering;

use crate::models::Record;

/// Four optional numeric components: year, part 1, part 2, part 3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortKey(pub [Option<u64>; 4]);

impl SortKey {
    /// Key with no numeric component; sorts after every other key.
    pub const ABSENT: SortKey = SortKey([None; 4]);
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| compare_component(*a, *b))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Present values compare numerically; absent is greater than any value.
pub fn compare_component(a: Option<u64>, b: Option<u64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse a component: a non-empty run of ASCII digits that fits in `u64`.
pub fn parse_component(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Stable sort of `rows` by the key computed for each row.
pub fn sort_records<F>(rows: Vec<Record>, key_of: F) -> Vec<Record>
where
    F: Fn(&Record) -> SortKey,
{
    let mut keyed: Vec<(SortKey, Record)> = rows.into_iter().map(|r| (key_of(&r), r)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(parts: [Option<u64>; 4]) -> SortKey {
        SortKey(parts)
    }

    #[test]
    fn test_parse_component() {
        assert_eq!(parse_component("2022"), Some(2022));
        assert_eq!(parse_component("007"), Some(7));
        assert_eq!(parse_component(""), None);
        assert_eq!(parse_component("1a"), None);
        assert_eq!(parse_component("-1"), None);
        assert_eq!(parse_component("99999999999999999999999"), None);
    }

    #[test]
    fn test_year_dominates() {
        let a = key([Some(2021), Some(5), Some(2), Some(1)]);
        let b = key([Some(2022), Some(1), Some(1), Some(1)]);
        assert!(a < b);
    }

    #[test]
    fn test_absent_component_sorts_last() {
        let numeric = key([Some(2022), Some(1), Some(1), Some(4)]);
        let partial = key([Some(2022), None, Some(1), Some(4)]);
        assert!(numeric < partial);
        assert!(partial < SortKey::ABSENT);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let rows: Vec<Record> = ["x", "a", "y", "b"]
            .iter()
            .map(|id| json!({ "id": id }).as_object().cloned().unwrap())
            .collect();

        let sorted = sort_records(rows, |row| match row["id"].as_str() {
            Some("a") => key([Some(1), None, None, None]),
            Some("b") => key([Some(2), None, None, None]),
            _ => SortKey::ABSENT,
        });

        let ids: Vec<&str> = sorted.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "x", "y"]);
    }
}
