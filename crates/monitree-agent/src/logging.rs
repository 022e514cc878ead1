//! tracing bootstrap.
//!
//! `RUST_LOG` wins when set; otherwise the filter comes from
//! `logging.level` plus `logging.selectors`.

use tracing_subscriber::{fmt, EnvFilter};

use monitree_core::error::{MonitreeError, Result};

use crate::config::LoggingSection;

/// Build the filter without installing anything.
pub fn build_filter(cfg: &LoggingSection) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directives = cfg.directives();
    EnvFilter::try_new(&directives)
        .map_err(|e| MonitreeError::BadConfig(format!("logging filter {directives:?}: {e}")))
}

/// Install the global subscriber. Fails if one is already set.
pub fn init(cfg: &LoggingSection) -> Result<()> {
    let filter = build_filter(cfg)?;
    let res = if cfg.to_stderr {
        fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init()
    } else {
        fmt().with_env_filter(filter).try_init()
    };
    res.map_err(|e| MonitreeError::Internal(format!("logging init failed: {e}")))
}
