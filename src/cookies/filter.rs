//! Cookie set narrowing

use std::collections::HashSet;

use crate::utils::StringUtils;

/// Narrows the read cookie set to either everything or an explicit
/// name allow-list.
#[derive(Debug, Clone)]
pub enum KeyFilter {
    All,
    Keys(HashSet<String>),
}

impl KeyFilter {
    /// Build a filter from request parameters: `copy_all` wins, otherwise
    /// the raw comma-separated key string is parsed into a set.
    pub fn from_request(copy_all: bool, keys: &str) -> Self {
        if copy_all {
            KeyFilter::All
        } else {
            KeyFilter::Keys(StringUtils::parse_keys(keys))
        }
    }

    /// Exact, case-sensitive name match.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            KeyFilter::All => true,
            KeyFilter::Keys(keys) => keys.contains(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::KeyFilter;
    use crate::cookies::test_cookie;

    #[test]
    fn copy_all_keeps_the_full_set() {
        let filter = KeyFilter::from_request(true, "ignored, names");
        let cookies = vec![test_cookie("a"), test_cookie("b"), test_cookie("c")];
        let kept: Vec<_> = cookies.iter().filter(|c| filter.matches(&c.name)).collect();
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn explicit_keys_match_exactly_regardless_of_token_noise() {
        let filter = KeyFilter::from_request(false, " b , a ,, a ");
        let cookies = vec![test_cookie("a"), test_cookie("b"), test_cookie("A")];
        let kept: Vec<_> = cookies
            .iter()
            .filter(|c| filter.matches(&c.name))
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(kept, vec!["a", "b"]);
    }

    #[test]
    fn empty_key_list_matches_nothing() {
        let filter = KeyFilter::from_request(false, " , ");
        assert!(!filter.matches("a"));
    }
}
