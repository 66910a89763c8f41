//! Proxy server.

use std::future::Future;
use std::sync::Arc;

use quizlens_config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::http::routes::create_router;
use crate::state::AppState;

/// The analysis proxy server.
pub struct ProxyServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl ProxyServer {
    pub fn new(config: ServerConfig, state: Arc<AppState>) -> Self {
        Self { config, state }
    }

    /// Get the server address.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until the process is stopped.
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then drain open connections.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = create_router(self.state.clone());
        let listener = TcpListener::bind(self.addr()).await?;

        info!("Analysis proxy listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Analysis proxy stopped");
        Ok(())
    }
}
