//! Scoped text transforms
//!
//! A transform is a pure `String -> String` function applied to every fragment pushed while
//! it is active. Transforms live on a stack so that nested scopes compose: the most recently
//! pushed transform is applied first and every outer transform wraps its result. For the
//! indentation used by nested bindings this means a fragment emitted at depth `k` carries
//! exactly `k` indent units.
//!
//! The stack itself has no notion of scope; callers acquire a transform through
//! [`Script::scoped`](crate::script::builder::Script::scoped) which restores the previous
//! depth on every exit path.

use std::fmt;

/// A boxed text-to-text function
pub struct TextTransform {
    name: String,
    run_fn: Box<dyn Fn(String) -> String + Send + Sync>,
}

impl TextTransform {
    /// Create a transform from a function
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        TextTransform {
            name: name.into(),
            run_fn: Box::new(f),
        }
    }

    /// Prefix every fragment with one indent unit
    pub fn indent(unit: impl Into<String>) -> Self {
        let unit = unit.into();
        Self::from_fn("indent", move |text| format!("{unit}{text}"))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, text: String) -> String {
        (self.run_fn)(text)
    }
}

impl fmt::Debug for TextTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextTransform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Stack of active transforms
#[derive(Debug, Default)]
pub struct TransformStack {
    transforms: Vec<TextTransform>,
}

impl TransformStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transform: TextTransform) {
        self.transforms.push(transform);
    }

    /// Remove the most recently pushed transform
    pub fn pop(&mut self) -> Option<TextTransform> {
        self.transforms.pop()
    }

    /// Drop transforms until the stack is back at `depth`
    pub fn truncate(&mut self, depth: usize) {
        self.transforms.truncate(depth);
    }

    pub fn depth(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Run `text` through the composed chain, innermost first
    pub fn apply(&self, text: String) -> String {
        self.transforms
            .iter()
            .rev()
            .fold(text, |acc, transform| transform.run(acc))
    }
}
