//! Tree traversal.
//!
//! A walk snapshots one node's entries under its read lock, releases it, then
//! reads values and descends. Concurrent changes elsewhere in the tree may or
//! may not be observed, but every visited entry is whole.

use crate::mode::Mode;
use crate::registry::{Entry, Registry};
use crate::value::Snapshot;

/// Structured traversal callbacks.
///
/// For each visible metric: `on_key` then `on_value`. For each sub-registry:
/// `on_key`, `on_registry_start`, its entries, `on_registry_finished`. The
/// node the walk starts from also gets a start/finished pair without a key.
pub trait Visitor {
    fn on_registry_start(&mut self);
    fn on_registry_finished(&mut self);
    fn on_key(&mut self, key: &str);
    fn on_value(&mut self, value: Snapshot);
}

impl Registry {
    /// Walk the tree below this node, skipping metrics not visible under `filter`.
    /// Keys are visited in sorted order per node, but callers should not rely on it.
    pub fn visit(&self, filter: Mode, vs: &mut dyn Visitor) {
        vs.on_registry_start();
        for (key, entry) in self.entries_sorted() {
            match entry {
                Entry::Metric { value, mode } => {
                    if !mode.visible_under(filter) {
                        continue;
                    }
                    vs.on_key(&key);
                    vs.on_value(value.snapshot());
                }
                Entry::Registry(child) => {
                    vs.on_key(&key);
                    child.visit(filter, vs);
                }
            }
        }
        vs.on_registry_finished();
    }

    /// Call `f` with the dotted name (relative to this node) and current
    /// reading of every metric visible under `filter`.
    pub fn do_each(&self, filter: Mode, mut f: impl FnMut(&str, Snapshot)) {
        let mut vs = KeyPathVisitor { path: Vec::new(), pending: None, f: &mut f };
        self.visit(filter, &mut vs);
    }
}

/// Turns structured callbacks into `(dotted.name, value)` pairs.
struct KeyPathVisitor<'a, F: FnMut(&str, Snapshot)> {
    path: Vec<String>,
    pending: Option<String>,
    f: &'a mut F,
}

impl<F: FnMut(&str, Snapshot)> Visitor for KeyPathVisitor<'_, F> {
    fn on_registry_start(&mut self) {
        if let Some(key) = self.pending.take() {
            self.path.push(key);
        }
    }

    fn on_registry_finished(&mut self) {
        self.path.pop();
    }

    fn on_key(&mut self, key: &str) {
        self.pending = Some(key.to_string());
    }

    fn on_value(&mut self, value: Snapshot) {
        let Some(key) = self.pending.take() else {
            return;
        };
        let name = if self.path.is_empty() {
            key
        } else {
            format!("{}.{}", self.path.join("."), key)
        };
        (self.f)(&name, value);
    }
}
