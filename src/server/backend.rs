//! Startup and graceful-drain orchestration
//!
//! Binding happens first and is fatal on failure. The warm-up timer only starts
//! once the listener is bound, and shutdown drops the listener before waiting
//! for in-flight requests.

use crate::config::Config;
use crate::server::health::{build_router, ReadinessState, ServerState};
use crate::server::metrics::{create_metrics, MetricsError, SharedMetrics};
use crate::server::shutdown::ShutdownSignal;
use crate::server::warmup::{spawn_warmup, WARMUP_INTERVAL};
use axum::Router;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("HTTP server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// How the drain after a shutdown request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every in-flight request completed
    Drained,
    /// The drain timeout expired with requests still open
    TimedOut,
}

/// A bound backend that has not started serving yet
pub struct Backend {
    listener: TcpListener,
    state: ServerState,
    extra_routes: Option<Router>,
    warmup: Duration,
    drain_timeout: Option<Duration>,
}

impl Backend {
    /// Bind `0.0.0.0:<port>` for the given configuration
    ///
    /// A bind failure is returned as-is; the caller is expected to exit.
    pub async fn bind(config: &Config) -> Result<Self, ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        Self::from_listener(listener, &config.version)
    }

    /// Wrap a listener that is already bound
    pub fn from_listener(listener: TcpListener, version: &str) -> Result<Self, ServerError> {
        let local_addr = listener.local_addr()?;
        let metrics = create_metrics(version)?;
        let state = ServerState::new(ReadinessState::new(), version, metrics);

        // Log after successful bind - server is actually listening
        info!(
            address = %local_addr,
            port = local_addr.port(),
            version = %version,
            "Backend listening"
        );

        Ok(Self {
            listener,
            state,
            extra_routes: None,
            warmup: WARMUP_INTERVAL,
            drain_timeout: None,
        })
    }

    /// Override the warm-up interval
    pub fn with_warmup(mut self, warmup: Duration) -> Self {
        self.warmup = warmup;
        self
    }

    /// Bound the drain after shutdown
    ///
    /// Without a timeout the drain waits for every in-flight request.
    pub fn with_drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = Some(timeout);
        self
    }

    /// Merge additional routes into the service router
    pub fn with_routes(mut self, routes: Router) -> Self {
        self.extra_routes = Some(match self.extra_routes.take() {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn readiness(&self) -> ReadinessState {
        self.state.readiness().clone()
    }

    pub fn metrics(&self) -> SharedMetrics {
        self.state.metrics().clone()
    }

    /// Serve until `shutdown` fires and in-flight requests have drained
    pub async fn run(self, shutdown: ShutdownSignal) -> Result<DrainOutcome, ServerError> {
        let Backend {
            listener,
            state,
            extra_routes,
            warmup,
            drain_timeout,
        } = self;

        let warmup_handle = spawn_warmup(
            state.readiness().clone(),
            state.metrics().clone(),
            state.version().to_string(),
            warmup,
        );

        let mut app = build_router(state);
        if let Some(routes) = extra_routes {
            app = app.merge(routes);
        }

        let mut stop = shutdown.clone();
        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                stop.wait().await;
                info!("Shutdown started: no longer accepting connections, draining in-flight requests");
            })
            .into_future();

        let outcome = match drain_timeout {
            None => {
                server.await?;
                DrainOutcome::Drained
            }
            Some(limit) => {
                let mut deadline = shutdown;
                tokio::select! {
                    result = server => {
                        result?;
                        DrainOutcome::Drained
                    }
                    _ = async move {
                        deadline.wait().await;
                        tokio::time::sleep(limit).await;
                    } => {
                        warn!(
                            timeout_ms = limit.as_millis() as u64,
                            "Drain timeout expired, abandoning remaining connections"
                        );
                        DrainOutcome::TimedOut
                    }
                }
            }
        };

        warmup_handle.abort();
        if outcome == DrainOutcome::Drained {
            info!("HTTP server closed");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
