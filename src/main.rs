use probe_backend::server::{
    shutdown_channel, Backend, DrainOutcome, TerminationSignals, WARMUP_INTERVAL,
};
use probe_backend::Config;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    info!(
        version = %config.version,
        port = config.port,
        warmup_ms = WARMUP_INTERVAL.as_millis() as u64,
        "Starting backend"
    );

    // Register before binding so an early SIGTERM is not missed
    let mut signals = match TerminationSignals::register() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "Failed to register termination signal handlers");
            return Err(e.into());
        }
    };

    // Bind failure is fatal; readiness never leaves `starting`
    let backend = match Backend::bind(&config).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, port = config.port, "Failed to start backend");
            return Err(e.into());
        }
    };

    let (shutdown_controller, shutdown_signal) = shutdown_channel();
    tokio::spawn(async move {
        let signal = signals.recv().await;
        info!(signal = signal, "Termination signal received: closing HTTP server");
        shutdown_controller.shutdown();
    });

    let outcome = match backend.run(shutdown_signal).await {
        Ok(o) => o,
        Err(e) => {
            error!(error = %e, "HTTP server failed");
            return Err(e.into());
        }
    };

    match outcome {
        DrainOutcome::Drained => info!("All in-flight requests drained"),
        DrainOutcome::TimedOut => warn!("Exiting with requests still in flight"),
    }

    info!(version = %config.version, "Backend shut down gracefully");
    Ok(())
}
