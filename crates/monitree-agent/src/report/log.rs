use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};

use monitree_core::{collect_flat, FlatSnapshot, Mode, Registry};

use crate::config::ReportSection;

/// Logs non-zero metric deltas every `period`, and the totals on shutdown.
pub struct LogReporter {
    registry: Arc<Registry>,
    period: Duration,
    mode: Mode,
}

impl LogReporter {
    pub fn new(registry: Arc<Registry>, period: Duration, mode: Mode) -> Self {
        Self { registry, period, mode }
    }

    pub fn from_config(registry: Arc<Registry>, cfg: &ReportSection) -> Self {
        Self::new(registry, Duration::from_millis(cfg.period_ms), cfg.mode)
    }

    /// Collect, diff against `prev`, and remember the new snapshot.
    pub fn tick(&self, prev: &mut FlatSnapshot) -> FlatSnapshot {
        let cur = collect_flat(&self.registry, self.mode);
        let delta = cur.delta(prev);
        *prev = cur;
        delta
    }

    fn log_delta(&self, delta: &FlatSnapshot) {
        let period_ms = self.period.as_millis() as u64;
        if delta.is_empty() {
            tracing::debug!(period_ms, "no non-zero metrics in the last period");
            return;
        }
        tracing::info!(
            period_ms,
            monitoring = %delta.to_json(),
            "non-zero metrics in the last period"
        );
    }

    /// Run until `shutdown` flips to `true` (or its sender goes away).
    /// The handle resolves to the final totals.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<FlatSnapshot> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) -> FlatSnapshot {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        tracing::info!(
            registry = %self.registry.name(),
            period_ms = self.period.as_millis() as u64,
            mode = self.mode.as_str(),
            "log reporter started"
        );

        let mut prev = FlatSnapshot::default();
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let delta = self.tick(&mut prev);
                    self.log_delta(&delta);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        let total = collect_flat(&self.registry, self.mode);
        tracing::info!(monitoring = %total.to_json(), "total metrics");
        tracing::info!("log reporter stopped");
        total
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use monitree_core::Snapshot;

    use super::*;

    #[test]
    fn tick_reports_movement_only() {
        let root = Arc::new(Registry::root("").unwrap());
        let events = root.new_uint("pipeline.events", Some(Mode::Reported)).unwrap();
        root.new_uint("pipeline.idle", Some(Mode::Reported)).unwrap();
        root.new_uint("debug.hidden", Some(Mode::Full)).unwrap().add(9);

        let reporter = LogReporter::new(Arc::clone(&root), Duration::from_secs(1), Mode::Reported);
        let mut prev = FlatSnapshot::default();

        events.add(4);
        let first = reporter.tick(&mut prev);
        assert_eq!(first.len(), 1);
        assert_eq!(first.get("pipeline.events"), Some(&Snapshot::Uint(4)));

        let second = reporter.tick(&mut prev);
        assert!(second.is_empty());

        events.add(1);
        let third = reporter.tick(&mut prev);
        assert_eq!(third.get("pipeline.events"), Some(&Snapshot::Uint(1)));
    }
}
