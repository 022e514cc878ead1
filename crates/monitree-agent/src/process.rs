//! Process info metrics under `info`.

use std::sync::Arc;
use std::time::Instant;

use monitree_core::error::Result;
use monitree_core::{Mode, Registry, Snapshot};

/// Register `info.uptime.ms`, `info.pid` and `info.version` under `reg`.
pub fn register(reg: &Registry, started: Instant) -> Result<Arc<Registry>> {
    let info = reg.new_registry("info", Some(Mode::Reported))?;

    info.new_func("uptime.ms", None, move || {
        Snapshot::Uint(started.elapsed().as_millis() as u64)
    })?;
    info.new_uint("pid", None)?.set(u64::from(std::process::id()));
    info.new_string("version", None)?.set(env!("CARGO_PKG_VERSION"));

    tracing::debug!(registry = %info.name(), "process metrics registered");
    Ok(info)
}
