//! Dotted path resolution.
//!
//! Walks never hold more than one node lock: each step clones the child handle
//! out of the parent's map and releases the parent before descending.

use std::sync::Arc;

use crate::registry::Registry;

pub const SEPARATOR: char = '.';

/// Split a dotted name. `None` if any segment is empty.
pub fn split(name: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = name.split(SEPARATOR).collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}

impl Registry {
    /// Read-only walk to the node owning the last segment, then apply `f`
    /// to that node and the last segment.
    pub(crate) fn with_parent<R>(
        &self,
        segments: &[&str],
        f: impl FnOnce(&Registry, &str) -> R,
    ) -> Option<R> {
        match segments {
            [] => None,
            [leaf] => Some(f(self, *leaf)),
            [first, rest @ ..] => {
                let child = self.child_registry(first)?;
                child.with_parent(rest, f)
            }
        }
    }

    /// Create-missing walk over every segment. Returns `None` when a segment
    /// already holds a metric; nodes created before that point stay.
    pub(crate) fn walk_or_create(&self, segments: &[&str]) -> Option<Arc<Registry>> {
        let (first, rest) = segments.split_first()?;
        let mut current = self.child_or_create(first)?;
        for seg in rest {
            let next = current.child_or_create(seg)?;
            current = next;
        }
        Some(current)
    }

    /// Like [`Registry::with_parent`] but creates missing intermediate nodes.
    pub(crate) fn with_parent_or_create<R>(
        &self,
        segments: &[&str],
        f: impl FnOnce(&Registry, &str) -> R,
    ) -> Option<R> {
        let (leaf, parents) = segments.split_last()?;
        if parents.is_empty() {
            return Some(f(self, *leaf));
        }
        let parent = self.walk_or_create(parents)?;
        Some(f(&parent, *leaf))
    }
}
