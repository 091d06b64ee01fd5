//! `partRefs` attribute parsing.

/// Split a comma-separated `partRefs` value into identifiers.
///
/// Entries are trimmed and empty entries dropped, so `" a,, b"` yields
/// `["a", "b"]`.
pub fn split_part_refs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims() {
        assert_eq!(split_part_refs("0,1,2"), vec!["0", "1", "2"]);
        assert_eq!(split_part_refs(" a,, b"), vec!["a", "b"]);
        assert_eq!(split_part_refs("7"), vec!["7"]);
    }

    #[test]
    fn blank_values_have_no_part_refs() {
        assert!(split_part_refs("").is_empty());
        assert!(split_part_refs(" , ,").is_empty());
        assert!(split_part_refs("   ").is_empty());
    }
}
