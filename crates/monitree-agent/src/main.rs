//! monitree agent
//!
//! - Loads `monitree.yaml` (or the path given as first argument)
//! - Bootstraps tracing from the `logging` section
//! - Registers process info metrics on a fresh root registry
//! - Runs the log reporter until Ctrl+C / SIGTERM

use std::time::Instant;

use tokio::sync::watch;

use monitree_agent::{build_registry, config, logging, process, report::LogReporter};

#[tokio::main]
async fn main() {
    let started = Instant::now();
    let path = std::env::args().nth(1).unwrap_or_else(|| "monitree.yaml".to_string());

    let cfg = config::load_from_file(&path).expect("config load failed");
    logging::init(&cfg.logging).expect("logging init failed");

    let registry = build_registry(&cfg.registry).expect("invalid registry name");
    process::register(&registry, started).expect("process metrics registration failed");

    tracing::info!(config = %path, registry = %registry.name(), "monitree-agent starting");

    let (stop_tx, stop_rx) = watch::channel(false);
    let reporter = cfg
        .report
        .enabled
        .then(|| LogReporter::from_config(registry.clone(), &cfg.report).spawn(stop_rx));

    shutdown_signal().await;
    let _ = stop_tx.send(true);

    if let Some(handle) = reporter {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "log reporter task failed");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, shutting down");
}
