//! hugo-search HTTP server entry point
//!
//! Opens (or builds) the index of a Hugo site and serves the search
//! API.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hugo_search::cli::Cli;
use hugo_search::core::config::{parse_listen_addr, Config};
use hugo_search::core::services::Services;
use hugo_search::http;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting hugo-search");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load configuration: file < environment < flags
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    config.validate()?;
    config.log_config();

    let addr = parse_listen_addr(&config.server.addr)?;

    // Open or build the index before accepting connections
    let services = Services::open(config, cli.reindex)?;
    if let Some(stats) = &services.build_stats {
        tracing::info!(
            pages = stats.pages_indexed,
            skipped = stats.files_skipped,
            drafts = stats.drafts_skipped,
            duration_ms = stats.duration_ms,
            "Index built"
        );
    }
    let index_name = services.index_name().to_string();

    let app = http::router(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "Service ready - search at http://{}/api/{}/_search",
        addr,
        index_name
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
