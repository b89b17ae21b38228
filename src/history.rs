use crate::model::{DEFAULT_HISTORY_LIMIT, HistoryPosition};
use std::collections::VecDeque;

/// Ids of previously played tracks, oldest first, with a cursor for back/forward replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackHistory {
    entries: VecDeque<String>,
    position: HistoryPosition,
    limit: usize,
}

impl Default for PlaybackHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl PlaybackHistory {
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            position: HistoryPosition::Live,
            limit,
        }
    }

    /// Rebuilds a history from persisted parts. Excess entries are evicted from the
    /// front and a position that no longer points at an entry falls back to `Live`.
    pub fn from_parts(entries: Vec<String>, position: HistoryPosition, limit: usize) -> Self {
        let mut history = Self::with_limit(limit);
        let dropped = entries.len().saturating_sub(history.limit);
        history.entries.extend(entries.into_iter().skip(dropped));
        history.position = match position {
            HistoryPosition::At(idx) if idx >= dropped && idx - dropped < history.len() => {
                HistoryPosition::At(idx - dropped)
            }
            _ => HistoryPosition::Live,
        };
        history
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn position(&self) -> HistoryPosition {
        self.position
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    /// Appends an id, evicting the oldest entries past the limit, and returns to the live end.
    pub fn push(&mut self, id: String) {
        self.entries.push_back(id);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.position = HistoryPosition::Live;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = HistoryPosition::Live;
    }

    /// Entry one step behind the cursor. `Live` counts as one past the last entry.
    pub fn back_target(&self) -> Option<usize> {
        match self.position {
            HistoryPosition::Live => self.entries.len().checked_sub(1),
            HistoryPosition::At(idx) => idx.checked_sub(1),
        }
    }

    /// Entry one step ahead of the cursor, if the cursor is not on the last entry.
    pub fn forward_target(&self) -> Option<usize> {
        let idx = self.position.index()?;
        let next = idx + 1;
        (next < self.entries.len()).then_some(next)
    }

    pub fn seek(&mut self, idx: usize) {
        if idx < self.entries.len() {
            self.position = HistoryPosition::At(idx);
        }
    }

    pub fn return_to_live(&mut self) {
        self.position = HistoryPosition::Live;
    }

    /// Drops the entry under the cursor and everything after it, so a new choice made
    /// while replaying starts a fresh branch.
    pub fn branch(&mut self) {
        if let HistoryPosition::At(idx) = self.position {
            self.entries.truncate(idx);
            self.position = HistoryPosition::Live;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(history: &PlaybackHistory) -> Vec<&str> {
        history.iter().collect()
    }

    #[test]
    fn push_evicts_oldest_past_limit() {
        let mut history = PlaybackHistory::with_limit(3);
        for id in ["a", "b", "c", "d", "e"] {
            history.push(id.to_string());
        }
        assert_eq!(ids(&history), vec!["c", "d", "e"]);
        assert_eq!(history.position(), HistoryPosition::Live);
    }

    #[test]
    fn live_end_steps_back_to_last_entry() {
        let mut history = PlaybackHistory::default();
        assert_eq!(history.back_target(), None);
        history.push(String::from("a"));
        history.push(String::from("b"));
        assert_eq!(history.back_target(), Some(1));
        assert_eq!(history.forward_target(), None);

        history.seek(1);
        assert_eq!(history.back_target(), Some(0));
        history.seek(0);
        assert_eq!(history.back_target(), None);
        assert_eq!(history.forward_target(), Some(1));
    }

    #[test]
    fn branch_discards_cursor_and_future() {
        let mut history = PlaybackHistory::default();
        for id in ["a", "b", "c", "d"] {
            history.push(id.to_string());
        }
        history.seek(1);
        history.branch();
        assert_eq!(ids(&history), vec!["a"]);
        assert_eq!(history.position(), HistoryPosition::Live);
    }

    #[test]
    fn branch_at_live_end_is_a_no_op() {
        let mut history = PlaybackHistory::default();
        history.push(String::from("a"));
        history.branch();
        assert_eq!(ids(&history), vec!["a"]);
    }

    #[test]
    fn from_parts_trims_and_repairs_position() {
        let entries: Vec<String> = (0..5).map(|n| format!("t{n}")).collect();
        let history = PlaybackHistory::from_parts(entries.clone(), HistoryPosition::At(3), 3);
        assert_eq!(ids(&history), vec!["t2", "t3", "t4"]);
        assert_eq!(history.position(), HistoryPosition::At(1));

        let evicted = PlaybackHistory::from_parts(entries.clone(), HistoryPosition::At(0), 3);
        assert_eq!(evicted.position(), HistoryPosition::Live);

        let stale = PlaybackHistory::from_parts(entries, HistoryPosition::At(40), 50);
        assert_eq!(stale.position(), HistoryPosition::Live);
    }

    #[test]
    fn seek_ignores_out_of_range() {
        let mut history = PlaybackHistory::default();
        history.push(String::from("a"));
        history.seek(4);
        assert_eq!(history.position(), HistoryPosition::Live);
    }
}
