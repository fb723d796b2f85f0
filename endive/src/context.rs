//! Symbol-indexed fact buckets
//!
//! Used both for the persistent axiom context of the goal engine and for
//! the transient hypotheses collected while checking buildability.

use crate::object::Object;
use std::collections::BTreeMap;

/// The symbol the default fact `True` is filed under
pub const DEFAULT_SYMBOL: &str = "=>";

/// Mapping from rewriting symbol to the ordered terms known under it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    buckets: BTreeMap<String, Vec<Object>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context every proof session starts from: `True` under `=>`
    pub fn seeded() -> Self {
        Self::new().with(DEFAULT_SYMBOL, Object::atom("True"))
    }

    pub fn contains(&self, symbol: &str, term: &Object) -> bool {
        self.buckets
            .get(symbol)
            .is_some_and(|bucket| bucket.contains(term))
    }

    pub fn bucket(&self, symbol: &str) -> &[Object] {
        self.buckets.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, symbol: &str, term: Object) {
        self.buckets.entry(symbol.to_string()).or_default().push(term);
    }

    /// A copy of this context with one more entry
    pub fn with(&self, symbol: &str, term: Object) -> Self {
        let mut extended = self.clone();
        extended.push(symbol, term);
        extended
    }

    /// Every entry of `other` appended after this context's entries
    pub fn merged(&self, other: &Context) -> Self {
        let mut merged = self.clone();
        for (symbol, term) in other.iter() {
            merged.push(symbol, term.clone());
        }
        merged
    }

    /// Entries in symbol order, insertion order within a symbol
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Object)> {
        self.buckets
            .iter()
            .flat_map(|(symbol, bucket)| bucket.iter().map(move |term| (symbol.as_str(), term)))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
