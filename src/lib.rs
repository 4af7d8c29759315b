//! Backend service with readiness probes and graceful shutdown
//!
//! The service starts not-ready, becomes ready after a fixed warm-up interval,
//! and drains in-flight requests before exiting on SIGTERM/SIGINT.

pub mod config;
pub mod server;

pub use config::{Config, ConfigError};
