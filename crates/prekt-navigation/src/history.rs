//! Navigation history
//!
//! One log for the whole process, fed by URI changes from every tab.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 512;

const BLANK_URI: &str = "about:blank";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub uri: String,
    pub visited_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl NavigationHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append `uri` unless it is blank or repeats the latest entry.
    /// Returns whether it was appended.
    pub fn record(&mut self, uri: &str) -> bool {
        if uri.is_empty() || uri == BLANK_URI {
            return false;
        }
        if self.latest().is_some_and(|e| e.uri == uri) {
            return false;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(HistoryEntry {
            uri: uri.to_string(),
            visited_at: Utc::now(),
        });

        tracing::trace!(uri = %uri, len = self.entries.len(), "History recorded");
        true
    }

    /// Up to `n` entries, most recent first
    pub fn last(&self, n: usize) -> Vec<&HistoryEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(history: &NavigationHistory, n: usize) -> Vec<&str> {
        history.last(n).into_iter().map(|e| e.uri.as_str()).collect()
    }

    #[test]
    fn test_consecutive_duplicates_recorded_once() {
        let mut history = NavigationHistory::default();
        assert!(history.record("https://example.com"));
        assert!(!history.record("https://example.com"));
        assert_eq!(history.len(), 1);

        // Only consecutive repeats are dropped
        history.record("https://rust-lang.org");
        assert!(history.record("https://example.com"));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_blank_never_recorded() {
        let mut history = NavigationHistory::default();
        assert!(!history.record("about:blank"));
        assert!(!history.record(""));
        assert!(history.is_empty());
    }

    #[test]
    fn test_last_is_most_recent_first() {
        let mut history = NavigationHistory::default();
        for uri in ["https://a.example", "https://b.example", "https://c.example"] {
            history.record(uri);
        }

        assert_eq!(uris(&history, 2), vec!["https://c.example", "https://b.example"]);
        assert_eq!(uris(&history, 10).len(), 3);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = NavigationHistory::new(2);
        history.record("https://a.example");
        history.record("https://b.example");
        history.record("https://c.example");

        assert_eq!(history.len(), 2);
        assert_eq!(uris(&history, 10), vec!["https://c.example", "https://b.example"]);
    }
}
