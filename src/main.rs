//! `issuetrackd` - Project-scoped issue tracking CRUD service.
//!
//! Serves `/api/issues/{project}` over a JSONL-backed document store.
//! No database server, no daemons beyond the listener itself.

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use issues_lib::InMemoryStore;
use issuetrack::config::Cli;
use issuetrack::{AppState, build_router, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Some(parent) = cli.data.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating data directory {}", parent.display()))?;
        }
    }

    let mut store = InMemoryStore::open_or_create(&cli.data)
        .with_context(|| format!("opening data file {}", cli.data.display()))?;
    store.set_prefix(cli.id_prefix);
    info!(
        projects = store.len(),
        data = %cli.data.display(),
        "store loaded"
    );

    let app = build_router(AppState::new(store));
    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("binding {}", cli.bind))?;
    info!(addr = %cli.bind, "issuetrackd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    // Best effort; if the signal handler can't install we just run
    // until killed.
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
