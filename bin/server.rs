// Expense Tracker - Web Server
// Wires configuration, logging, the shared store, report scheduler and routes.

use anyhow::{Context, Result};
use expense_tracker::api::{router, AppState};
use expense_tracker::{AppConfig, LogSink, Schedule, Scheduler, SharedStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = AppConfig::load().context("Failed to load configuration")?;

    // Single in-memory store, shared by handlers and the scheduler
    let store = SharedStore::new();

    if cfg.scheduler_enabled_or_default() {
        let schedules = Schedule::from_config(&cfg)?;
        let scheduler = Scheduler::new(store.clone(), Arc::new(LogSink), schedules);
        let tasks = scheduler.spawn();
        info!(tasks = tasks.len(), "Summary reports scheduled");
    } else {
        info!("Summary reports disabled");
    }

    let app = router(AppState::new(store));

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        addr = %addr,
        "Server is running on http://localhost:{}",
        cfg.port_or_default()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
