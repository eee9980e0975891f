pub mod command;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::bus::Alert;
use crate::config::NotifyConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum NotifyError {
    /// The user has not granted (or has disabled) visual alerts. The
    /// audible cue is still attempted.
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("alert delivery failed: {0}")]
    Delivery(String),
}

// ---------------------------------------------------------------------------
// NotificationSink trait
// ---------------------------------------------------------------------------

/// A destination that can present an alert. Errors never propagate back
/// into the scheduler; the delivery loop logs them and moves on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &str;

    /// Present the visual alert.
    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;

    /// Best-effort audible cue. Implementations swallow their own
    /// failures; audio output is unreliable by nature (missing player,
    /// muted session, no audio device).
    async fn play_cue(&self);
}

/// Build the configured sink set: the local command notifier always, the
/// webhook forwarder when a URL is configured.
pub fn build_sinks(cfg: &NotifyConfig) -> Vec<Arc<dyn NotificationSink>> {
    let mut sinks: Vec<Arc<dyn NotificationSink>> =
        vec![Arc::new(command::CommandSink::new(cfg.clone()))];
    if !cfg.webhook_url.is_empty() {
        sinks.push(Arc::new(webhook::WebhookSink::new(cfg.webhook_url.clone())));
    }
    sinks
}

// ---------------------------------------------------------------------------
// Delivery loop
// ---------------------------------------------------------------------------

/// Per-sink delivery loop over the alert bus. A denied permission skips
/// the visual alert but still plays the cue; delivery failures are
/// logged and never retried here.
pub fn spawn_delivery_loop(
    sink: Arc<dyn NotificationSink>,
    mut rx: broadcast::Receiver<Alert>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let alert = tokio::select! {
                _ = cancel.cancelled() => return,
                recv = rx.recv() => match recv {
                    Ok(alert) => alert,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(sink = sink.name(), skipped = n, "Alert delivery lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                },
            };
            match sink.notify(&alert).await {
                Ok(()) => {}
                Err(NotifyError::PermissionDenied) => {
                    debug!(sink = sink.name(), "Visual alert skipped (permission denied)");
                }
                Err(e) => {
                    warn!(sink = sink.name(), error = %e, "Alert delivery failed");
                }
            }
            sink.play_cue().await;
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
