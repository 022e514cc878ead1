//! Scalar metric kinds.
//!
//! All kinds are lock-free atomics except [`Str`], which guards its string with
//! a `RwLock`. Each implements [`Value`] so it can be registered anywhere in a
//! [`Registry`](crate::Registry).

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::value::{Snapshot, Value};

/// Signed counter / gauge.
#[derive(Debug, Default)]
pub struct Int {
    v: AtomicI64,
}

impl Int {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> i64 {
        self.v.load(Ordering::Relaxed)
    }
    pub fn set(&self, v: i64) {
        self.v.store(v, Ordering::Relaxed);
    }
    pub fn add(&self, delta: i64) {
        self.v.fetch_add(delta, Ordering::Relaxed);
    }
    pub fn inc(&self) {
        self.add(1);
    }
    pub fn dec(&self) {
        self.add(-1);
    }
}

impl Value for Int {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Int(self.get())
    }
}

/// Unsigned counter.
#[derive(Debug, Default)]
pub struct Uint {
    v: AtomicU64,
}

impl Uint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.v.load(Ordering::Relaxed)
    }
    pub fn set(&self, v: u64) {
        self.v.store(v, Ordering::Relaxed);
    }
    pub fn add(&self, delta: u64) {
        self.v.fetch_add(delta, Ordering::Relaxed);
    }
    pub fn inc(&self) {
        self.add(1);
    }
}

impl Value for Uint {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Uint(self.get())
    }
}

/// Float gauge stored as raw `f64` bits.
#[derive(Debug)]
pub struct Float {
    bits: AtomicU64,
}

impl Default for Float {
    fn default() -> Self {
        Self { bits: AtomicU64::new(0f64.to_bits()) }
    }
}

impl Float {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
    pub fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Add `delta` with a CAS loop.
    pub fn add(&self, delta: f64) {
        let mut cur = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self.bits.compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

impl Value for Float {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Float(self.get())
    }
}

/// String value (e.g. a version or state name).
#[derive(Debug, Default)]
pub struct Str {
    s: RwLock<String>,
}

impl Str {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> String {
        self.s.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
    pub fn set(&self, v: impl Into<String>) {
        *self.s.write().unwrap_or_else(PoisonError::into_inner) = v.into();
    }
    pub fn clear(&self) {
        self.s.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl Value for Str {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Str(self.get())
    }
}

/// Boolean flag.
#[derive(Debug, Default)]
pub struct Bool {
    v: AtomicBool,
}

impl Bool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.v.load(Ordering::Relaxed)
    }
    pub fn set(&self, v: bool) {
        self.v.store(v, Ordering::Relaxed);
    }
}

impl Value for Bool {
    fn snapshot(&self) -> Snapshot {
        Snapshot::Bool(self.get())
    }
}

/// Value computed on every read.
pub struct Func {
    f: Box<dyn Fn() -> Snapshot + Send + Sync>,
}

impl Func {
    pub fn new(f: impl Fn() -> Snapshot + Send + Sync + 'static) -> Self {
        Self { f: Box::new(f) }
    }
}

impl fmt::Debug for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func").finish_non_exhaustive()
    }
}

impl Value for Func {
    fn snapshot(&self) -> Snapshot {
        (self.f)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_add_and_dec() {
        let i = Int::new();
        i.add(5);
        i.dec();
        assert_eq!(i.snapshot(), Snapshot::Int(4));
    }

    #[test]
    fn float_add_accumulates() {
        let f = Float::new();
        f.add(1.5);
        f.add(0.25);
        assert_eq!(f.get(), 1.75);
    }

    #[test]
    fn str_set_and_clear() {
        let s = Str::new();
        s.set("running");
        assert_eq!(s.snapshot(), Snapshot::Str("running".into()));
        s.clear();
        assert!(s.snapshot().is_zero());
    }

    #[test]
    fn func_reads_on_demand() {
        let f = Func::new(|| Snapshot::Uint(42));
        assert_eq!(f.snapshot().as_u64(), Some(42));
    }
}
