//! monitree agent library entry.
//!
//! Wires config loading, tracing bootstrap, process info metrics and the
//! periodic log reporter around a `monitree-core` registry. Consumed by the
//! binary (`main.rs`) and by integration tests.

pub mod config;
pub mod logging;
pub mod process;
pub mod report;

use std::sync::Arc;

use monitree_core::{Registry, Result};

/// Root registry described by the `registry` config section.
pub fn build_registry(cfg: &config::RegistrySection) -> Result<Arc<Registry>> {
    Ok(Arc::new(Registry::with_mode(cfg.name.clone(), cfg.default_mode)?))
}
