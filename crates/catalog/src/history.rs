use std::collections::VecDeque;

use bookfinder_availability::config::DEFAULT_HISTORY_CAPACITY;
use bookfinder_availability::AvailabilityConfig;
use serde::{Deserialize, Serialize};

/// Recently searched keywords, most recent first.
///
/// Owned by the caller (one per user session); nothing in the resolvers
/// reads it. Keywords are trimmed, and adding one that is already present
/// moves it to the front instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistory {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SearchHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn from_config(config: &AvailabilityConfig) -> Self {
        Self::new(config.history_capacity)
    }

    /// Record a search. Blank keywords are ignored.
    pub fn add(&mut self, keyword: &str) {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.capacity == 0 {
            return;
        }

        self.entries.retain(|existing| existing != keyword);
        self.entries.push_front(keyword.to_string());
        self.entries.truncate(self.capacity);
    }

    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(String::as_str).collect()
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut history = SearchHistory::default();
        history.add("こころ");
        history.add("坊っちゃん");

        assert_eq!(history.list(), vec!["坊っちゃん", "こころ"]);
        assert_eq!(history.most_recent(), Some("坊っちゃん"));
    }

    #[test]
    fn test_readding_moves_to_front() {
        let mut history = SearchHistory::default();
        history.add("a");
        history.add("b");
        history.add("c");
        history.add(" a ");

        assert_eq!(history.list(), vec!["a", "c", "b"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = SearchHistory::default();
        for keyword in ["1", "2", "3", "4", "5", "6"] {
            history.add(keyword);
        }

        assert_eq!(history.capacity(), 5);
        assert_eq!(history.list(), vec!["6", "5", "4", "3", "2"]);
    }

    #[test]
    fn test_blank_keywords_ignored() {
        let mut history = SearchHistory::default();
        history.add("");
        history.add(" \t");

        assert!(history.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = SearchHistory::new(0);
        history.add("こころ");
        assert!(history.is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = AvailabilityConfig {
            history_capacity: 2,
            ..AvailabilityConfig::default()
        };
        let mut history = SearchHistory::from_config(&config);
        history.add("a");
        history.add("b");
        history.add("c");

        assert_eq!(history.list(), vec!["c", "b"]);
    }

    #[test]
    fn test_clear() {
        let mut history = SearchHistory::default();
        history.add("a");
        history.clear();
        assert_eq!(history.most_recent(), None);
    }
}
