//! Token counting used for context budgets.
//!
//! Budgets across the subsystem are denominated in whatever unit the
//! counter returns. The default [`WordCounter`] counts whitespace-delimited
//! words, a deliberate approximation of model tokenization that keeps the
//! core free of tokenizer dependencies. Callers needing exact counts plug
//! in their own [`TokenCounter`].

/// Counts tokens for budget arithmetic.
pub trait TokenCounter: Send + Sync {
    /// Token count for `text`. Empty and whitespace-only text counts as 0.
    fn count(&self, text: &str) -> usize;
}

/// Whitespace word counter, the reference approximation.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
