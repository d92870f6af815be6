//! Ordered fragment storage
//!
//! The text stack is the only source of truth for the order of the script body. Fragments
//! are pushed already transformed and are never edited, removed or reordered afterwards.

/// Append-only sequence of emitted text fragments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStack {
    fragments: Vec<String>,
}

impl TextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a fragment to the end of the stack
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    /// All fragments, in the order they were pushed
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenation of every fragment
    pub fn concat(&self) -> String {
        self.fragments.concat()
    }
}
