// 🔍 Search - case-insensitive prefix match over every column

use crate::entry::Entry;

/// True when any field of the entry starts with the query, ignoring case.
/// An empty query matches everything.
pub fn matches_query(entry: &Entry, query: &str) -> bool {
    let needle = query.to_uppercase();
    entry
        .fields()
        .iter()
        .any(|field| field.to_uppercase().starts_with(&needle))
}

/// Entries matching the query, in their original order
pub fn filter_entries<'a, I>(entries: I, query: &str) -> Vec<Entry>
where
    I: IntoIterator<Item = &'a Entry>,
{
    entries
        .into_iter()
        .filter(|entry| matches_query(entry, query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entries() -> Vec<Entry> {
        vec![
            Entry::new("Jane Doe", "Civic", "ABC-1234", "2024-01-01", "1"),
            Entry::new("John Roe", "Vespa", "JR-55555", "2024-02-10", "2"),
            Entry::new("Ana", "Corolla", "XYZ-9876", "2024-03-15", "12"),
        ]
    }

    #[test]
    fn test_empty_query_matches_all() {
        let entries = sample_entries();
        assert_eq!(filter_entries(&entries, "").len(), 3);
    }

    #[test]
    fn test_case_insensitive_prefix() {
        let entries = sample_entries();

        let found = filter_entries(&entries, "jan");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].owner, "Jane Doe");

        let found = filter_entries(&entries, "vesp");
        assert_eq!(found[0].license_plate, "JR-55555");
    }

    #[test]
    fn test_prefix_not_substring() {
        let entries = sample_entries();
        assert!(filter_entries(&entries, "Doe").is_empty(), "Match anchors at field start");
    }

    #[test]
    fn test_matches_any_column_and_keeps_order() {
        let entries = sample_entries();

        // "1" starts slot "1", slot "12"
        let found = filter_entries(&entries, "1");
        let slots: Vec<&str> = found.iter().map(|e| e.slot_number.as_str()).collect();
        assert_eq!(slots, vec!["1", "12"]);

        let found = filter_entries(&entries, "2024-0");
        assert_eq!(found.len(), 3);
    }
}
