//! Bounded command history with an Up/Down recall pointer.

use std::collections::VecDeque;

/// Entries kept in memory and in the vault.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// `None` means "past the newest entry" (fresh input line).
    cursor: Option<usize>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from storage, keeping only the newest `HISTORY_LIMIT`.
    pub fn from_entries(entries: Vec<String>) -> Self {
        let skip = entries.len().saturating_sub(HISTORY_LIMIT);
        Self {
            entries: entries.into_iter().skip(skip).collect(),
            cursor: None,
        }
    }

    /// Push a new entry, evicting the oldest past the limit. Resets recall.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.push_back(entry.into());
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_front();
        }
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// 1-indexed lookup, as used by `!n`.
    pub fn nth(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Move the pointer one step older. Clamps at the oldest entry.
    pub fn recall_up(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            Some(i) => i.saturating_sub(1),
            None => self.entries.len() - 1,
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Move the pointer one step newer. Clamps at the newest entry.
    pub fn recall_down(&mut self) -> Option<&str> {
        let i = self.cursor?;
        let idx = (i + 1).min(self.entries.len().saturating_sub(1));
        self.cursor = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}
