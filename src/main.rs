//! Trendwatch - headless crypto top-movers watcher
//!
//! Fetches a market snapshot on a recurring cadence, ranks the top and bottom
//! movers by hourly and daily change, and publishes results to listeners
//! (log mirror, fixed-width report, CSV history). Reports land under
//! `crypto_records/` next to the binary.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

use trendwatch::application::system::Application;
use trendwatch::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging (stdout only)
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Trendwatch {} starting...", env!("CARGO_PKG_VERSION"));

    // All configuration is in-memory and resets on restart.
    let config = Config::default();
    info!(
        "Watching {} (top {} per view)",
        config.snapshot_url,
        config.view_limit.as_len()
    );

    let app = Application::build(config).await?;

    // A scheduler that fails to start is fatal: nothing would ever refresh.
    app.start().await?;
    info!("Trendwatch running.");

    std::future::pending::<()>().await;
    Ok(())
}
