//! Webhook notifications for executed scheduled votes.
//!
//! Each POST runs on its own task; failures are logged and never retried.
//! The notifier keeps the task handles so a shutting-down watch can wait a
//! bounded time for deliveries still in flight.

use std::sync::Mutex;
use std::time::Duration;

use mgrant_governance::ExecutionReport;
use mgrant_types::Timestamp;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

const COLOR_SUCCESS: u32 = 0x2ecc71;
const COLOR_FAILURE: u32 = 0xe74c3c;

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Post `payload` in the background.
    pub fn notify(&self, payload: Value) {
        let client = self.client.clone();
        let url = self.url.clone();
        let handle = tokio::spawn(async move {
            match client.post(&url).json(&payload).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!(status = %resp.status(), "webhook delivered");
                }
                Ok(resp) => {
                    tracing::warn!(status = %resp.status(), "webhook rejected notification");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "webhook delivery failed");
                }
            }
        });

        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.retain(|h| !h.is_finished());
        in_flight.push(handle);
    }

    /// Deliveries not yet finished.
    pub fn pending(&self) -> usize {
        let in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait up to `limit` for in-flight deliveries, then abandon the rest.
    pub async fn drain(&self, limit: Duration) {
        let mut handles = std::mem::take(&mut *self.in_flight.lock().unwrap_or_else(|e| e.into_inner()));
        if handles.is_empty() {
            return;
        }
        let count = handles.len();
        let wait = async {
            for handle in handles.iter_mut() {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(limit, wait).await.is_err() {
            let abandoned = handles.iter().filter(|h| !h.is_finished()).count();
            tracing::warn!(abandoned, of = count, "webhook deliveries still in flight at shutdown");
            for handle in &handles {
                handle.abort();
            }
        }
    }
}

/// Embed payload describing one execution.
pub fn execution_embed(report: &ExecutionReport, at: Timestamp) -> Value {
    let (title, description, color) = match &report.outcome {
        Ok(tx_id) => (
            "Scheduled vote executed",
            format!(
                "Voted **{}** on proposal #{}\nTransaction: `{}`",
                report.vote_type, report.proposal_id, tx_id
            ),
            COLOR_SUCCESS,
        ),
        Err(e) => (
            "Scheduled vote failed",
            format!(
                "Vote **{}** on proposal #{} failed: {}",
                report.vote_type, report.proposal_id, e
            ),
            COLOR_FAILURE,
        ),
    };
    json!({
        "embeds": [{
            "title": title,
            "description": description,
            "color": color,
            "timestamp": at.as_secs(),
        }]
    })
}
