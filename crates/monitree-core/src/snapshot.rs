//! Point-in-time collections of a registry's metrics.
//!
//! Both collectors are built on [`Visitor`] and inherit its per-node
//! consistency: each node is read under its own lock, the tree as a whole is
//! not frozen.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::mode::Mode;
use crate::registry::Registry;
use crate::value::Snapshot;
use crate::visitor::Visitor;

/// Dotted name -> reading, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatSnapshot(pub BTreeMap<String, Snapshot>);

impl FlatSnapshot {
    pub fn get(&self, name: &str) -> Option<&Snapshot> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Readings that moved since `previous`.
    ///
    /// Ints report their signed difference, uints their increase (or the new
    /// value after a reset). Other kinds report the current value when it
    /// changed. Metrics that are new since `previous` are kept unless zero.
    pub fn delta(&self, previous: &FlatSnapshot) -> FlatSnapshot {
        let mut out = BTreeMap::new();
        for (name, cur) in &self.0 {
            let moved = match (cur, previous.0.get(name)) {
                (Snapshot::Int(c), Some(Snapshot::Int(p))) => {
                    Some(Snapshot::Int(c.wrapping_sub(*p))).filter(|d| !d.is_zero())
                }
                (Snapshot::Uint(c), Some(Snapshot::Uint(p))) => {
                    let d = if c >= p { c - p } else { *c };
                    Some(Snapshot::Uint(d)).filter(|d| !d.is_zero())
                }
                (c, None) => (!c.is_zero()).then(|| c.clone()),
                (c, Some(p)) => (c != p).then(|| c.clone()),
            };
            if let Some(v) = moved {
                out.insert(name.clone(), v);
            }
        }
        FlatSnapshot(out)
    }

    /// Nest dotted names back into a JSON object.
    pub fn to_json(&self) -> Json {
        let mut root = Map::new();
        for (name, v) in &self.0 {
            insert_dotted(&mut root, name, snapshot_json(v));
        }
        Json::Object(root)
    }
}

fn insert_dotted(root: &mut Map<String, Json>, name: &str, v: Json) -> Option<()> {
    let mut parts: Vec<&str> = name.split('.').collect();
    let leaf = parts.pop()?;
    let mut cur = root;
    for p in parts {
        let slot = cur
            .entry(p.to_string())
            .or_insert_with(|| Json::Object(Map::new()));
        if !slot.is_object() {
            *slot = Json::Object(Map::new());
        }
        cur = slot.as_object_mut()?;
    }
    cur.insert(leaf.to_string(), v);
    Some(())
}

fn snapshot_json(v: &Snapshot) -> Json {
    match v {
        Snapshot::Int(i) => Json::from(*i),
        Snapshot::Uint(u) => Json::from(*u),
        Snapshot::Float(f) => serde_json::Number::from_f64(*f)
            .map(Json::Number)
            .unwrap_or(Json::Null),
        Snapshot::Bool(b) => Json::Bool(*b),
        Snapshot::Str(s) => Json::String(s.clone()),
    }
}

/// Every metric visible under `mode`, keyed by its dotted name relative to
/// `registry`.
pub fn collect_flat(registry: &Registry, mode: Mode) -> FlatSnapshot {
    let mut out = BTreeMap::new();
    registry.do_each(mode, |name, v| {
        out.insert(name.to_string(), v);
    });
    FlatSnapshot(out)
}

/// Nested JSON object mirroring the tree. Sub-registries with nothing
/// visible under `mode` are left out.
pub fn collect_structured(registry: &Registry, mode: Mode) -> Json {
    let mut vs = StructVisitor::default();
    registry.visit(mode, &mut vs);
    Json::Object(vs.done.unwrap_or_default())
}

#[derive(Default)]
struct StructVisitor {
    stack: Vec<(Option<String>, Map<String, Json>)>,
    key: Option<String>,
    done: Option<Map<String, Json>>,
}

impl Visitor for StructVisitor {
    fn on_registry_start(&mut self) {
        self.stack.push((self.key.take(), Map::new()));
    }

    fn on_registry_finished(&mut self) {
        let Some((key, map)) = self.stack.pop() else {
            return;
        };
        match (self.stack.last_mut(), key) {
            (Some((_, parent)), Some(key)) => {
                if !map.is_empty() {
                    parent.insert(key, Json::Object(map));
                }
            }
            _ => self.done = Some(map),
        }
    }

    fn on_key(&mut self, key: &str) {
        self.key = Some(key.to_string());
    }

    fn on_value(&mut self, value: Snapshot) {
        let Some(key) = self.key.take() else {
            return;
        };
        if let Some((_, map)) = self.stack.last_mut() {
            map.insert(key, snapshot_json(&value));
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    fn sample() -> Registry {
        let root = Registry::root("root").unwrap();
        root.new_int("net.in", Some(Mode::Reported)).unwrap().set(3);
        root.new_string("info.version", Some(Mode::Reported)).unwrap().set("1.0");
        root.new_uint("debug.allocs", Some(Mode::Full)).unwrap().set(9);
        root
    }

    #[test]
    fn flat_collects_dotted_names() {
        let snap = collect_flat(&sample(), Mode::Full);
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.get("net.in"), Some(&Snapshot::Int(3)));
        assert_eq!(snap.get("debug.allocs"), Some(&Snapshot::Uint(9)));
    }

    #[test]
    fn structured_drops_empty_registries() {
        let v = collect_structured(&sample(), Mode::Reported);
        assert_eq!(v, json!({"net": {"in": 3}, "info": {"version": "1.0"}}));
    }

    #[test]
    fn flat_to_json_matches_structured() {
        let reg = sample();
        assert_eq!(collect_flat(&reg, Mode::Full).to_json(), collect_structured(&reg, Mode::Full));
    }

    #[test]
    fn delta_reports_only_movement() {
        let reg = Registry::root("").unwrap();
        let events = reg.new_uint("events", None).unwrap();
        let active = reg.new_int("active", None).unwrap();
        let state = reg.new_string("state", None).unwrap();
        events.add(10);
        active.set(4);
        state.set("up");
        let first = collect_flat(&reg, Mode::Full);

        events.add(5);
        active.set(1);
        let second = collect_flat(&reg, Mode::Full);

        let d = second.delta(&first);
        assert_eq!(d.get("events"), Some(&Snapshot::Uint(5)));
        assert_eq!(d.get("active"), Some(&Snapshot::Int(-3)));
        assert!(d.get("state").is_none());

        let initial = first.delta(&FlatSnapshot::default());
        assert_eq!(initial.len(), 3);
    }

    #[test]
    fn delta_after_counter_reset_reports_new_value() {
        let mut prev = BTreeMap::new();
        prev.insert("c".to_string(), Snapshot::Uint(100));
        let mut cur = BTreeMap::new();
        cur.insert("c".to_string(), Snapshot::Uint(7));
        let d = FlatSnapshot(cur).delta(&FlatSnapshot(prev));
        assert_eq!(d.get("c"), Some(&Snapshot::Uint(7)));
    }
}
