//! Stopping `vote watch` cleanly.
//!
//! OS signals and programmatic requests both end up as one [`StopReason`]
//! sent on a broadcast channel that the watch loop selects on.

use std::fmt;

use tokio::signal;
use tokio::sync::broadcast;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Interrupt,
    Terminate,
    Requested,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
            Self::Requested => "stop requested",
        })
    }
}

/// Fans a single stop event out to every loop that subscribed.
pub struct ShutdownController {
    tx: broadcast::Sender<StopReason>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StopReason> {
        self.tx.subscribe()
    }

    /// Stop every subscriber. Later calls are no-ops for receivers that
    /// already stopped.
    pub fn stop(&self, reason: StopReason) {
        // No receivers left means nothing is running.
        let _ = self.tx.send(reason);
    }

    /// Resolve on the first SIGINT or SIGTERM and broadcast it.
    pub async fn stop_on_signal(&self) {
        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable, only Ctrl-C stops the watch");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        let reason = tokio::select! {
            _ = signal::ctrl_c() => StopReason::Interrupt,
            _ = terminate => StopReason::Terminate,
        };
        tracing::info!(%reason, "stopping");
        self.stop(reason);
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stop_reaches_every_subscriber_with_its_reason() {
        let controller = ShutdownController::new();
        let mut watch_loop = controller.subscribe();
        let mut flusher = controller.subscribe();

        controller.stop(StopReason::Requested);
        assert_eq!(watch_loop.recv().await.unwrap(), StopReason::Requested);
        assert_eq!(flusher.recv().await.unwrap(), StopReason::Requested);
    }

    #[test]
    fn stop_without_subscribers_is_harmless() {
        ShutdownController::default().stop(StopReason::Terminate);
    }

    #[test]
    fn reasons_display_as_signal_names() {
        assert_eq!(StopReason::Interrupt.to_string(), "SIGINT");
        assert_eq!(StopReason::Terminate.to_string(), "SIGTERM");
    }
}
