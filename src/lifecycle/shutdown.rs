//! Shutdown coordination for the service.

use tokio::sync::broadcast;

use crate::lifecycle::signals::wait_for_signal;

/// Fans a single stop request out to every long-running task.
///
/// The HTTP server subscribes before it starts serving; `main` triggers
/// once an OS signal arrives.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Tell every subscriber to stop. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Wait for SIGINT/SIGTERM, then trigger.
    pub async fn trigger_on_signal(&self) {
        wait_for_signal().await;
        let listeners = self.trigger();
        tracing::info!(listeners, "Shutdown signal received");
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
