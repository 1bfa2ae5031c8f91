//! Kanban client command line
//!
//! Drives the projects store against a live backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kb_client::HttpProjectsApi;
use kb_core::config::{AppConfig, LogFormat, LoggingConfig};
use kb_notifications::{MemoryNotifier, NotifierSet, TracingNotifier};
use kb_router::Router;
use kb_store::ProjectsStore;

mod commands;

use commands::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    cli.apply_overrides(&mut config);
    init_tracing(&config.logging);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "starting kanban client"
    );

    let router = Arc::new(Router::app().context("route table is invalid")?);

    // Routing needs no backend
    if let Command::Route { path, from } = &cli.command {
        return commands::route(&router, path, from.as_deref());
    }

    let api = HttpProjectsApi::new(&config.api).context("cannot create API client")?;
    let toasts = Arc::new(MemoryNotifier::new());
    let notifier = NotifierSet::new()
        .with(Arc::new(TracingNotifier))
        .with(toasts.clone());
    let store = ProjectsStore::new(Arc::new(api), Arc::new(notifier), router);

    let result = commands::run(&store, cli.command).await;
    for toast in toasts.errors() {
        eprintln!("error: {}", toast.message);
    }
    result
}

/// `RUST_LOG` wins over the configured filter. Logs go to stderr so stdout carries
/// command output only.
fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
