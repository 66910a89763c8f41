//! `serve` subcommand.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use quizlens_api::{AppState, ProxyServer};
use quizlens_config::Config;

pub(crate) async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    info!("Starting QuizLens proxy v{}", env!("CARGO_PKG_VERSION"));
    let state = AppState::from_settings(&config.provider).context("building model backend")?;
    info!(
        "Provider: {} (temperature {})",
        state.pipeline.backend_id(),
        config.provider.temperature
    );

    let server = ProxyServer::new(config.server, Arc::new(state));
    server
        .run_until(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}
