//! Registry nodes.
//!
//! A node owns `local name -> Entry` behind its own `RwLock`. Dotted names are
//! resolved relative to the node an operation is called on.

mod entry;
pub mod path;

use std::collections::hash_map;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{MonitreeError, Result};
use crate::metrics::{Bool, Float, Func, Int, Str, Uint};
use crate::mode::Mode;
use crate::value::{self, Snapshot, Value};

pub(crate) use entry::Entry;

/// One level of the metrics namespace.
pub struct Registry {
    name: String,
    mode: Mode,
    entries: RwLock<HashMap<String, Entry>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("len", &self.len())
            .finish()
    }
}

impl Registry {
    /// New root node with `Full` as default mode. An empty name is allowed;
    /// children of an empty-named root are named by their segment alone.
    /// Any other name must be a valid dotted path.
    pub fn root(name: impl Into<String>) -> Result<Self> {
        Self::with_mode(name, Mode::Full)
    }

    /// New root node with an explicit default mode.
    pub fn with_mode(name: impl Into<String>, mode: Mode) -> Result<Self> {
        let name = name.into();
        if !name.is_empty() && path::split(&name).is_none() {
            return Err(MonitreeError::InvalidName(name));
        }
        Ok(Self::node(name, mode))
    }

    /// Unchecked constructor for nodes whose name is built from valid segments.
    pub(crate) fn node(name: String, mode: Mode) -> Self {
        Self {
            name,
            mode,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fully-qualified dotted name of this node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mode applied to entries added without an explicit one.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn qualify(&self, local: &str) -> String {
        if self.name.is_empty() {
            local.to_string()
        } else {
            format!("{}.{}", self.name, local)
        }
    }

    pub(crate) fn child_registry(&self, segment: &str) -> Option<Arc<Registry>> {
        self.read().get(segment)?.as_registry().cloned()
    }

    fn child_metric(&self, segment: &str) -> Option<Arc<dyn Value>> {
        self.read().get(segment)?.as_metric().cloned()
    }

    pub(crate) fn child_or_create(&self, segment: &str) -> Option<Arc<Registry>> {
        let mut entries = self.write();
        match entries.entry(segment.to_string()) {
            hash_map::Entry::Occupied(o) => o.get().as_registry().cloned(),
            hash_map::Entry::Vacant(v) => {
                let child = Arc::new(Registry::node(self.qualify(segment), self.mode));
                tracing::debug!(registry = %child.name, "created sub-registry");
                v.insert(Entry::Registry(Arc::clone(&child)));
                Some(child)
            }
        }
    }

    fn insert_vacant(&self, segment: &str, entry: Entry) -> Result<()> {
        let mut entries = self.write();
        match entries.entry(segment.to_string()) {
            hash_map::Entry::Occupied(o) => {
                let full = self.qualify(segment);
                tracing::warn!(
                    name = %full,
                    existing = o.get().kind(),
                    new = entry.kind(),
                    "name already registered"
                );
                Err(MonitreeError::collision(&full))
            }
            hash_map::Entry::Vacant(v) => {
                tracing::debug!(name = %self.qualify(segment), kind = entry.kind(), "registered");
                v.insert(entry);
                Ok(())
            }
        }
    }

    // --------------------
    // Registration
    // --------------------

    /// Attach `value` under the dotted `name`, creating missing intermediate
    /// registries. Fails if the final slot is taken by anything, or if a
    /// metric sits where an intermediate registry is needed.
    ///
    /// `Ok` means the value was inserted into the node the walk resolved. A
    /// concurrent `remove` of one of its ancestors can detach that node, in
    /// which case the value is no longer reachable from this registry.
    pub fn add(&self, name: &str, value: Arc<dyn Value>, mode: Option<Mode>) -> Result<()> {
        let segments =
            path::split(name).ok_or_else(|| MonitreeError::InvalidName(name.to_string()))?;
        self.with_parent_or_create(&segments, |parent, leaf| {
            let mode = mode.unwrap_or(parent.mode);
            parent.insert_vacant(leaf, Entry::Metric { value, mode })
        })
        .unwrap_or_else(|| {
            tracing::warn!(registry = %self.name, name, "metric on path blocks registration");
            Err(MonitreeError::collision(name))
        })
    }

    /// Register `value` and hand back a typed handle to it.
    pub fn register<V: Value + 'static>(
        &self,
        name: &str,
        value: V,
        mode: Option<Mode>,
    ) -> Result<Arc<V>> {
        let handle = Arc::new(value);
        self.add(name, Arc::clone(&handle) as Arc<dyn Value>, mode)?;
        Ok(handle)
    }

    pub fn new_int(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Int>> {
        self.register(name, Int::new(), mode)
    }

    pub fn new_uint(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Uint>> {
        self.register(name, Uint::new(), mode)
    }

    pub fn new_float(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Float>> {
        self.register(name, Float::new(), mode)
    }

    pub fn new_string(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Str>> {
        self.register(name, Str::new(), mode)
    }

    pub fn new_bool(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Bool>> {
        self.register(name, Bool::new(), mode)
    }

    pub fn new_func(
        &self,
        name: &str,
        mode: Option<Mode>,
        f: impl Fn() -> Snapshot + Send + Sync + 'static,
    ) -> Result<Arc<Func>> {
        self.register(name, Func::new(f), mode)
    }

    /// Create an empty sub-registry at `name`. The final slot must be vacant;
    /// without an explicit mode the child inherits its parent's.
    /// Like [`Registry::add`], a racing removal of an ancestor can leave the
    /// new child detached.
    pub fn new_registry(&self, name: &str, mode: Option<Mode>) -> Result<Arc<Registry>> {
        let segments =
            path::split(name).ok_or_else(|| MonitreeError::InvalidName(name.to_string()))?;
        self.with_parent_or_create(&segments, |parent, leaf| {
            let mode = mode.unwrap_or(parent.mode);
            let child = Arc::new(Registry::node(parent.qualify(leaf), mode));
            parent.insert_vacant(leaf, Entry::Registry(Arc::clone(&child)))?;
            Ok(child)
        })
        .unwrap_or_else(|| Err(MonitreeError::collision(name)))
    }

    // --------------------
    // Lookup
    // --------------------

    /// Metric handle at `name`, or `None` if the path does not end on a metric.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Value>> {
        let segments = path::split(name)?;
        self.with_parent(&segments, |parent, leaf| parent.child_metric(leaf))?
    }

    /// Current reading of the metric at `name`.
    pub fn get_snapshot(&self, name: &str) -> Option<Snapshot> {
        self.get(name).map(|v| v.snapshot())
    }

    /// Typed handle; `None` on absence or on a type mismatch.
    pub fn get_as<T: Value + 'static>(&self, name: &str) -> Option<Arc<T>> {
        value::downcast::<T>(self.get(name)?)
    }

    /// Sub-registry at `name`, or `None` if the path does not end on one.
    pub fn get_registry(&self, name: &str) -> Option<Arc<Registry>> {
        let segments = path::split(name)?;
        self.with_parent(&segments, |parent, leaf| parent.child_registry(leaf))?
    }

    /// Resolve `name`, creating missing registries along the way. `None` if a
    /// metric occupies any segment.
    pub fn get_or_create_registry(&self, name: &str) -> Option<Arc<Registry>> {
        let segments = path::split(name)?;
        let found = self.walk_or_create(&segments);
        if found.is_none() {
            tracing::warn!(registry = %self.name, name, "metric on path blocks registry creation");
        }
        found
    }

    // --------------------
    // Removal
    // --------------------

    /// Remove the metric or subtree at `name`. Unresolved paths are a no-op.
    /// Returns whether something was removed.
    pub fn remove(&self, name: &str) -> bool {
        let Some(segments) = path::split(name) else {
            return false;
        };
        let removed = self
            .with_parent(&segments, |parent, leaf| parent.write().remove(leaf))
            .flatten();
        match removed {
            Some(entry) => {
                tracing::debug!(registry = %self.name, name, kind = entry.kind(), "removed");
                true
            }
            None => false,
        }
    }

    /// Drop every entry of this node (and so every subtree below it).
    pub fn clear(&self) {
        let old = std::mem::take(&mut *self.write());
        tracing::debug!(registry = %self.name, dropped = old.len(), "cleared");
    }

    /// Entries of this node, cloned out of the lock and sorted by key.
    pub(crate) fn entries_sorted(&self) -> Vec<(String, Entry)> {
        let mut out: Vec<(String, Entry)> = self
            .read()
            .iter()
            .map(|(k, e)| (k.clone(), e.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
