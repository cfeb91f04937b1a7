//! Wealth server - the service entry point.
//!
//! Owns the cache handle and upstream client for the lifetime of the process;
//! both are dropped when the server shuts down.

use crate::api::{self, AppState};
use crate::cache::CacheHandle;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::upstream::BillionaireApi;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A running wealth data service.
pub struct WealthServer {
    state: Arc<AppState>,
}

impl WealthServer {
    /// Create a server whose cache connects lazily from `config`.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let cache = CacheHandle::from_config(&config);
        Self::with_cache(config, cache)
    }

    /// Create a server over an explicit cache handle.
    pub fn with_cache(config: ApiConfig, cache: CacheHandle) -> Result<Self> {
        let upstream = BillionaireApi::from_config(&config)?;
        Ok(Self {
            state: Arc::new(AppState {
                config,
                cache,
                upstream,
            }),
        })
    }

    /// Shared handler state.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Router serving the API.
    pub fn router(&self) -> Router {
        api::build_router(self.state())
    }

    /// Bind the configured address and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.api_addr;
        tracing::info!("Wealth server starting");
        tracing::info!("  API: http://{}", addr);
        tracing::info!(
            "  Cache: {}",
            self.state
                .config
                .kv
                .as_ref()
                .map(|kv| kv.url.as_str())
                .unwrap_or("not configured")
        );
        tracing::info!(
            "  Refresh auth: {}",
            if self.state.config.cron_secret.is_some() {
                "bearer secret"
            } else {
                "open"
            }
        );

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Wealth server stopped");
        Ok(())
    }
}
