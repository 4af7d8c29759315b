//! Prometheus metrics for the backend
//!
//! - `backend_ready` (gauge): 0 while starting, 1 once warmed up
//! - `backend_health_checks_total{status}` (counter): `/health` responses by status
//! - `backend_info{version}` (gauge): always 1, carries the version label

use crate::server::health::Readiness;
use prometheus::{Encoder, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Metrics output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Metrics registry with the backend's collectors
pub struct Metrics {
    registry: Registry,
    ready: IntGauge,
    health_checks: IntCounterVec,
}

/// Metrics handle shared between handlers and the warm-up task
pub type SharedMetrics = Arc<Metrics>;

impl Metrics {
    /// Register all collectors in a fresh registry
    pub fn new(version: &str) -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let ready = IntGauge::new(
            "backend_ready",
            "Whether the backend has finished warming up (1) or is still starting (0)",
        )?;
        registry.register(Box::new(ready.clone()))?;

        let health_checks = IntCounterVec::new(
            Opts::new(
                "backend_health_checks_total",
                "Health check responses served, by reported status",
            ),
            &["status"],
        )?;
        registry.register(Box::new(health_checks.clone()))?;

        let info = IntGaugeVec::new(
            Opts::new("backend_info", "Backend build information"),
            &["version"],
        )?;
        registry.register(Box::new(info.clone()))?;
        info.with_label_values(&[version]).set(1);

        Ok(Self {
            registry,
            ready,
            health_checks,
        })
    }

    pub fn set_ready(&self) {
        self.ready.set(1);
    }

    pub fn record_health_check(&self, readiness: Readiness) {
        self.health_checks
            .with_label_values(&[readiness.as_str()])
            .inc();
    }

    /// Encode all metrics in Prometheus text format
    pub fn encode(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Create the shared metrics handle
pub fn create_metrics(version: &str) -> Result<SharedMetrics, MetricsError> {
    Metrics::new(version).map(Arc::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_gauge_starts_at_zero() {
        let metrics = create_metrics("v1").unwrap();
        let output = metrics.encode().unwrap();

        assert!(output.contains("backend_ready 0"), "got:\n{}", output);
    }

    #[test]
    fn test_set_ready_updates_gauge() {
        let metrics = create_metrics("v1").unwrap();
        metrics.set_ready();

        assert!(metrics.encode().unwrap().contains("backend_ready 1"));
    }

    #[test]
    fn test_health_checks_counted_by_status() {
        let metrics = create_metrics("v1").unwrap();
        metrics.record_health_check(Readiness::Starting);
        metrics.record_health_check(Readiness::Starting);
        metrics.record_health_check(Readiness::Ready);

        let output = metrics.encode().unwrap();
        assert!(output.contains(r#"backend_health_checks_total{status="starting"} 2"#));
        assert!(output.contains(r#"backend_health_checks_total{status="ok"} 1"#));
    }

    #[test]
    fn test_info_carries_version_label() {
        let metrics = create_metrics("v7").unwrap();

        assert!(metrics
            .encode()
            .unwrap()
            .contains(r#"backend_info{version="v7"} 1"#));
    }

    /// Each handle owns its registry, so creating two never collides
    #[test]
    fn test_independent_registries() {
        let first = create_metrics("v1").unwrap();
        let second = create_metrics("v1").unwrap();
        first.set_ready();

        assert!(second.encode().unwrap().contains("backend_ready 0"));
    }
}
