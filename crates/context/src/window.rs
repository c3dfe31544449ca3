//! Short-term conversation window.
//!
//! A bounded FIFO over the most recent turns. Eviction is always
//! oldest-first, and the window never empties itself: trimming stops at
//! one entry even when that entry alone exceeds the budget.

use mnemon_core::{ContextEntry, Message, TokenCounter};
use std::collections::VecDeque;

/// A FIFO window over the most recent conversation turns.
#[derive(Debug, Clone)]
pub struct ShortTermWindow {
    entries: VecDeque<ContextEntry>,
    max_entries: usize,
}

impl ShortTermWindow {
    /// Create an empty window capped at `max_entries` entries (floor 1).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Append the newest turn, evicting oldest entries over the cap.
    pub fn push(&mut self, entry: ContextEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Evict oldest entries until the window fits `token_budget`.
    ///
    /// Never trims below one entry.
    pub fn trim(&mut self, token_budget: usize, counter: &dyn TokenCounter) {
        let mut total = self.token_total(counter);
        while self.entries.len() > 1 && total > token_budget {
            if let Some(oldest) = self.entries.pop_front() {
                total -= counter.count(&oldest.content);
            }
        }
    }

    /// The window contents, oldest first.
    pub fn tail(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    /// Total token count of the window under `counter`.
    pub fn token_total(&self, counter: &dyn TokenCounter) -> usize {
        self.entries.iter().map(|e| counter.count(&e.content)).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild the window from a newest-first slice of the log.
    ///
    /// Takes the output of `MessageStore::recent` as-is; entries land
    /// oldest first and the cap applies as if they had been pushed live.
    pub fn rehydrate(&mut self, recent_newest_first: &[Message]) {
        self.entries.clear();
        for message in recent_newest_first.iter().rev() {
            self.push(message.to_entry());
        }
    }
}
