//! Readiness tracking and the public HTTP endpoints
//!
//! - `/health` - Readiness: 200 once warmed up, 503 while starting
//! - `/version` - The configured version label
//! - `/` - Plain-text greeting
//! - `/metrics` - Prometheus metrics in text format

use crate::server::metrics::SharedMetrics;
use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Observable readiness of the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Starting,
    Ready,
}

impl Readiness {
    /// Value of the `status` field in the `/health` body
    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Starting => "starting",
            Readiness::Ready => "ok",
        }
    }

    pub fn status_code(self) -> StatusCode {
        match self {
            Readiness::Starting => StatusCode::SERVICE_UNAVAILABLE,
            Readiness::Ready => StatusCode::OK,
        }
    }
}

/// Shared state for readiness tracking
///
/// Starts out as [`Readiness::Starting`]. The warm-up task flips it to
/// [`Readiness::Ready`] exactly once; there is no way back.
#[derive(Debug, Clone)]
pub struct ReadinessState {
    ready: Arc<AtomicBool>,
}

impl ReadinessState {
    /// Create a new readiness state (initially starting)
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Mark the service as ready
    ///
    /// Returns `true` only for the call that performed the transition.
    pub fn set_ready(&self) -> bool {
        !self.ready.swap(true, Ordering::SeqCst)
    }

    /// Check if the service is ready
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Readiness {
        if self.is_ready() {
            Readiness::Ready
        } else {
            Readiness::Starting
        }
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by all handlers
#[derive(Clone)]
pub struct ServerState {
    readiness: ReadinessState,
    version: Arc<str>,
    metrics: SharedMetrics,
}

impl ServerState {
    /// Create new server state
    pub fn new(readiness: ReadinessState, version: &str, metrics: SharedMetrics) -> Self {
        Self {
            readiness,
            version: Arc::from(version),
            metrics,
        }
    }

    pub fn readiness(&self) -> &ReadinessState {
        &self.readiness
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }
}

#[derive(Debug, Serialize)]
struct HealthBody<'a> {
    status: &'static str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct VersionBody<'a> {
    version: &'a str,
}

/// Readiness probe handler
///
/// Returns 200 `{"status":"ok"}` if ready, 503 `{"status":"starting"}` if not.
/// Reads the readiness flag once so status code and body always agree.
async fn health(State(state): State<ServerState>) -> impl IntoResponse {
    let readiness = state.readiness.current();
    state.metrics.record_health_check(readiness);

    (
        readiness.status_code(),
        Json(HealthBody {
            status: readiness.as_str(),
            version: state.version(),
        }),
    )
        .into_response()
}

/// Version handler, independent of readiness
async fn version(State(state): State<ServerState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(VersionBody {
            version: state.version(),
        }),
    )
        .into_response()
}

async fn root(State(state): State<ServerState>) -> String {
    greeting(state.version())
}

/// Prometheus metrics handler
///
/// Returns metrics in Prometheus text format for scraping.
async fn metrics(State(state): State<ServerState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {}", e),
        )
            .into_response(),
    }
}

/// Body served by `GET /`
pub fn greeting(version: &str) -> String {
    format!("Hello from Backend {}!", version)
}

/// Build the router for all service endpoints
///
/// Unknown paths fall through to axum's default 404.
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/metrics", get(self::metrics))
        .route("/", get(root))
        .with_state(state)
}
