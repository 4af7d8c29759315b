//! Graceful shutdown handling for the backend
//!
//! Handles SIGTERM and SIGINT signals for clean shutdown:
//! - Stops accepting new connections
//! - Waits for in-flight requests to complete
//! - Exits with status 0

use tokio::sync::watch;
use tracing::info;

/// Shutdown signal receiver
///
/// Cloned and handed to every component that has to stop on shutdown.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for shutdown signal
    pub async fn wait(&mut self) {
        // Wait until the value becomes true
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Sender dropped, treat as shutdown
                break;
            }
        }
    }

    /// Check if shutdown was signaled (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Controller for triggering shutdown
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Trigger shutdown
    ///
    /// Only the first call has an effect.
    pub fn shutdown(&self) {
        let triggered = self.sender.send_if_modified(|down| !std::mem::replace(down, true));
        if triggered {
            info!("Shutdown signal sent");
        }
    }
}

/// Create a new shutdown signal pair
///
/// Returns (controller, signal) where:
/// - controller: Used to trigger shutdown
/// - signal: Cloned and passed to components that need to listen
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Termination signal handlers, registered once at startup
///
/// Registering before the listener binds means a SIGTERM that arrives during
/// startup is not lost.
#[cfg(unix)]
pub struct TerminationSignals {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    /// Register SIGTERM and SIGINT handlers
    pub fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    /// Wait for SIGTERM or SIGINT
    ///
    /// Returns the signal name that was received.
    pub async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => {
                info!("Received SIGTERM");
                "SIGTERM"
            }
            _ = self.sigint.recv() => {
                info!("Received SIGINT");
                "SIGINT"
            }
        }
    }
}

/// Ctrl+C handler (Windows)
#[cfg(not(unix))]
pub struct TerminationSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(not(unix))]
impl TerminationSignals {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    pub async fn recv(&mut self) -> &'static str {
        self.ctrl_c.recv().await;
        info!("Received Ctrl+C");
        "CTRL_C"
    }
}
