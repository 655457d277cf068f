//! Command line history with prefix matching
//!
//! Typing "w" and pressing Up finds the most recent command starting with "w".

use crate::constants::history;
use std::collections::VecDeque;

/// Bounded command history
#[derive(Debug, Clone)]
pub struct CommandHistory {
    /// Stored entries, oldest first
    items: VecDeque<String>,
    capacity: usize,
    /// Position during navigation (None = at the line being typed)
    cursor: Option<usize>,
    /// The line being typed when navigation started; the prefix to match
    original_line: Option<String>,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(history::DEFAULT_SIZE)
    }
}

impl CommandHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
            cursor: None,
            original_line: None,
        }
    }

    /// Record a command
    ///
    /// Empty commands and repeats of the newest entry are skipped.
    /// Navigation state is always reset.
    pub fn add(&mut self, command: impl Into<String>) {
        let command = command.into();
        self.reset_navigation();
        if command.is_empty() || self.items.back() == Some(&command) {
            return;
        }
        self.items.push_back(command);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
    }

    /// Change the capacity, dropping the oldest entries if needed
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.items.len() > self.capacity {
            self.items.pop_front();
        }
        self.reset_navigation();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remember the typed line before the first Up/Down
    pub fn start_navigation(&mut self, current_line: &str) {
        if self.original_line.is_none() {
            self.original_line = Some(current_line.to_string());
        }
    }

    /// Step to the previous (older) entry starting with the typed prefix
    ///
    /// Returns `None` when there is no older match; the position is unchanged.
    pub fn prev_match(&mut self) -> Option<&str> {
        let start = match self.cursor {
            Some(0) => return None,
            Some(idx) => idx,
            None => self.items.len(),
        };
        let prefix = self.original_line.as_deref().unwrap_or("");
        let found = (0..start).rev().find(|&i| self.items[i].starts_with(prefix))?;
        self.cursor = Some(found);
        Some(&self.items[found])
    }

    /// Step to the next (newer) matching entry
    ///
    /// Past the newest match this returns the originally typed line and ends
    /// navigation. Returns `None` when not navigating.
    pub fn next_match(&mut self) -> Option<&str> {
        let idx = self.cursor?;
        let prefix = self.original_line.as_deref().unwrap_or("");
        match ((idx + 1)..self.items.len()).find(|&i| self.items[i].starts_with(prefix)) {
            Some(found) => {
                self.cursor = Some(found);
                Some(&self.items[found])
            }
            None => {
                self.cursor = None;
                self.original_line.as_deref()
            }
        }
    }

    pub fn reset_navigation(&mut self) {
        self.cursor = None;
        self.original_line = None;
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
