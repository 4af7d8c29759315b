//! HTTP server with readiness probe and graceful shutdown
//!
//! Provides the backend endpoints:
//! - `/health` - Readiness probe (503 during warm-up, 200 afterwards)
//! - `/version` - Configured version label
//! - `/` - Greeting
//! - `/metrics` - Prometheus metrics
//!
//! Also provides graceful shutdown handling for SIGTERM/SIGINT.

mod backend;
mod health;
pub mod metrics;
pub mod shutdown;
mod warmup;

pub use backend::{Backend, DrainOutcome, ServerError};
pub use health::{build_router, greeting, Readiness, ReadinessState, ServerState};
pub use metrics::{create_metrics, MetricsError, SharedMetrics};
pub use shutdown::{shutdown_channel, ShutdownController, ShutdownSignal, TerminationSignals};
pub use warmup::{spawn_warmup, WARMUP_INTERVAL};

#[cfg(test)]
#[path = "health_test.rs"]
mod health_tests;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
