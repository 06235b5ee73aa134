use std::collections::HashSet;

/// Prefix that switches `==`/`!=` into dimension-membership mode when the
/// right operand's text starts with it.
pub const FILTER_MARKER: &str = "xls";

/// Set of dimension-membership keys of the form `<filterName>-<value>`.
///
/// Built once from a package's filter list and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterIndex {
    keys: HashSet<String>,
}

impl FilterIndex {
    /// Build an index from filter key strings. Duplicate keys collapse.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the exact composite key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Whether `<filter>-<value>` is present.
    #[must_use]
    pub fn is_member(&self, filter: &str, value: &str) -> bool {
        self.contains(&format!("{filter}-{value}"))
    }

    /// The number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in sorted order.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys.iter().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_uses_composite_key() {
        let index = FilterIndex::new(["xlsSeg-10", "xlsSeg-20"]);
        assert!(index.is_member("xlsSeg", "10"));
        assert!(!index.is_member("xlsSeg", "99"));
        assert!(!index.is_member("xlsRegion", "10"));
    }

    #[test]
    fn duplicates_collapse() {
        let index = FilterIndex::new(vec!["xlsA-1".to_owned(), "xlsA-1".to_owned()]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn value_with_dash_is_kept_verbatim() {
        let index = FilterIndex::new(["xlsZip-10-20"]);
        assert!(index.is_member("xlsZip", "10-20"));
        assert!(index.contains("xlsZip-10-20"));
    }

    #[test]
    fn sorted_keys() {
        let index = FilterIndex::new(["xlsB-1", "xlsA-1"]);
        assert_eq!(index.sorted_keys(), vec!["xlsA-1", "xlsB-1"]);
    }
}
