//! Process-wide default registry.
//!
//! Subsystems that are handed an explicit [`Registry`] should use it; this
//! root exists for code that has no owner to receive one from. It is created
//! on first use (empty name, `Full` mode) unless [`init`] ran first, and can be
//! wiped with [`clear`].

use std::sync::{Arc, OnceLock};

use crate::error::{MonitreeError, Result};
use crate::metrics::{Bool, Float, Int, Str, Uint};
use crate::mode::Mode;
use crate::registry::Registry;
use crate::value::{Snapshot, Value};

static DEFAULT: OnceLock<Arc<Registry>> = OnceLock::new();

/// Configure the default root. Fails once the root exists, whether from an
/// earlier `init` or from lazy creation. An invalid name is rejected without
/// creating the root.
pub fn init(name: &str, mode: Mode) -> Result<Arc<Registry>> {
    let fresh = Registry::with_mode(name, mode)?;
    let mut created = false;
    let reg = DEFAULT.get_or_init(|| {
        created = true;
        Arc::new(fresh)
    });
    if !created {
        return Err(MonitreeError::Internal(
            "default registry already initialized".into(),
        ));
    }
    tracing::debug!(name, mode = mode.as_str(), "default registry initialized");
    Ok(Arc::clone(reg))
}

/// The default root.
pub fn registry() -> Arc<Registry> {
    Arc::clone(DEFAULT.get_or_init(|| Arc::new(Registry::node(String::new(), Mode::Full))))
}

/// Empty the default root.
pub fn clear() {
    registry().clear();
}

pub fn get(name: &str) -> Option<Arc<dyn Value>> {
    registry().get(name)
}

pub fn get_registry(name: &str) -> Option<Arc<Registry>> {
    registry().get_registry(name)
}

pub fn get_or_create_registry(name: &str) -> Option<Arc<Registry>> {
    registry().get_or_create_registry(name)
}

pub fn new_registry(name: &str, mode: Option<Mode>) -> Result<Arc<Registry>> {
    registry().new_registry(name, mode)
}

pub fn remove(name: &str) -> bool {
    registry().remove(name)
}

pub fn do_each(mode: Mode, f: impl FnMut(&str, Snapshot)) {
    registry().do_each(mode, f);
}

fn on<R>(reg: Option<&Registry>, f: impl FnOnce(&Registry) -> R) -> R {
    match reg {
        Some(r) => f(r),
        None => f(&registry()),
    }
}

/// Register an [`Int`] under `reg`, or under the default root when `None`.
pub fn new_int(reg: Option<&Registry>, name: &str, mode: Option<Mode>) -> Result<Arc<Int>> {
    on(reg, |r| r.new_int(name, mode))
}

pub fn new_uint(reg: Option<&Registry>, name: &str, mode: Option<Mode>) -> Result<Arc<Uint>> {
    on(reg, |r| r.new_uint(name, mode))
}

pub fn new_float(reg: Option<&Registry>, name: &str, mode: Option<Mode>) -> Result<Arc<Float>> {
    on(reg, |r| r.new_float(name, mode))
}

pub fn new_string(reg: Option<&Registry>, name: &str, mode: Option<Mode>) -> Result<Arc<Str>> {
    on(reg, |r| r.new_string(name, mode))
}

pub fn new_bool(reg: Option<&Registry>, name: &str, mode: Option<Mode>) -> Result<Arc<Bool>> {
    on(reg, |r| r.new_bool(name, mode))
}
