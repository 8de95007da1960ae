//! Shallow merging of node records and edge payloads.

use serde_json::{Map, Value};

/// A value that can absorb a partial update.
///
/// Used by [`Graph::merge_node`](crate::Graph::merge_node) and
/// [`Graph::merge_edge`](crate::Graph::merge_edge).
pub trait Merge: Sized {
    /// The partial update.
    type Patch: ?Sized;

    /// Apply `patch` to a copy of `self`.
    ///
    /// Returns `None` if the patch would leave `self` unchanged, so that
    /// callers can keep the existing value (and its identity).
    fn merge(&self, patch: &Self::Patch) -> Option<Self>;
}

/// Field-wise merge: every field of the patch overwrites the field of the
/// same name, other fields are kept.
impl Merge for Map<String, Value> {
    type Patch = Map<String, Value>;

    fn merge(&self, patch: &Self::Patch) -> Option<Self> {
        let mut changes = patch
            .iter()
            .filter(|&(field, value)| self.get(field) != Some(value))
            .peekable();
        changes.peek()?;

        let mut merged = self.clone();
        merged.extend(changes.map(|(field, value)| (field.clone(), value.clone())));
        Some(merged)
    }
}
