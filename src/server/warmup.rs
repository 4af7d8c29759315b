//! One-shot warm-up timer
//!
//! The backend reports `starting` for a fixed interval after it binds, then
//! flips to ready for the rest of its life.

use crate::server::health::ReadinessState;
use crate::server::metrics::SharedMetrics;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Delay between binding the listener and reporting ready
pub const WARMUP_INTERVAL: Duration = Duration::from_millis(5000);

/// Spawn the warm-up task
///
/// Sleeps for `delay`, then marks the service ready. The task runs
/// independently of request handling and fires once.
pub fn spawn_warmup(
    readiness: ReadinessState,
    metrics: SharedMetrics,
    version: String,
    delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        if readiness.set_ready() {
            metrics.set_ready();
            info!(version = %version, "Backend is ready to accept traffic");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::health::Readiness;
    use crate::server::metrics::create_metrics;

    #[tokio::test(start_paused = true)]
    async fn test_not_ready_before_interval() {
        let readiness = ReadinessState::new();
        let metrics = create_metrics("v1").unwrap();
        let _handle = spawn_warmup(
            readiness.clone(),
            metrics,
            "v1".to_string(),
            WARMUP_INTERVAL,
        );

        tokio::time::sleep(Duration::from_millis(4999)).await;

        assert_eq!(readiness.current(), Readiness::Starting);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_interval() {
        let readiness = ReadinessState::new();
        let metrics = create_metrics("v1").unwrap();
        let handle = spawn_warmup(
            readiness.clone(),
            metrics.clone(),
            "v1".to_string(),
            WARMUP_INTERVAL,
        );

        handle.await.unwrap();

        assert_eq!(readiness.current(), Readiness::Ready);
        assert!(metrics.encode().unwrap().contains("backend_ready 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_ready() {
        let readiness = ReadinessState::new();
        let metrics = create_metrics("v1").unwrap();
        spawn_warmup(
            readiness.clone(),
            metrics,
            "v1".to_string(),
            Duration::from_millis(10),
        )
        .await
        .unwrap();

        tokio::time::sleep(Duration::from_secs(3600)).await;

        assert!(readiness.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_aborted_timer_never_fires() {
        let readiness = ReadinessState::new();
        let metrics = create_metrics("v1").unwrap();
        let handle = spawn_warmup(
            readiness.clone(),
            metrics,
            "v1".to_string(),
            WARMUP_INTERVAL,
        );

        handle.abort();
        tokio::time::sleep(WARMUP_INTERVAL * 2).await;

        assert!(!readiness.is_ready());
    }
}
