//! The value capability: what a metric must provide to live in a registry.

use std::any::Any;
use std::sync::Arc;

use serde::Serialize;

/// Point-in-time reading of a metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Snapshot {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Snapshot::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Snapshot::Uint(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Snapshot::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Snapshot::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Zero / empty / false.
    pub fn is_zero(&self) -> bool {
        match self {
            Snapshot::Int(v) => *v == 0,
            Snapshot::Uint(v) => *v == 0,
            Snapshot::Float(v) => *v == 0.0,
            Snapshot::Bool(v) => !*v,
            Snapshot::Str(v) => v.is_empty(),
        }
    }
}

/// Upcast helper so typed handles can be recovered from `Arc<dyn Value>`.
pub trait AsAny {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A metric the registry can hold. The registry never interprets the value;
/// it only asks for a snapshot while iterating.
pub trait Value: AsAny + Send + Sync {
    fn snapshot(&self) -> Snapshot;
}

/// Recover a typed handle from a registry value.
pub fn downcast<T: Value + 'static>(value: Arc<dyn Value>) -> Option<Arc<T>> {
    value.as_any_arc().downcast::<T>().ok()
}
