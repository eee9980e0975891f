//! Webhook sink: forwards each alert as a `{"notification": {...}}`
//! push payload, so the receiving end can render it exactly like a
//! remote-origin push.

use async_trait::async_trait;

use super::{NotificationSink, NotifyError};
use crate::bus::{Alert, PushNotification, PushPayload};

pub struct WebhookSink {
    url: String,
    client: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

fn to_payload(alert: &Alert) -> PushPayload {
    PushPayload {
        notification: PushNotification {
            title: Some(alert.title.clone()),
            body: Some(alert.body.clone()),
            icon: alert.icon.clone(),
        },
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&to_payload(alert))
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        resp.error_for_status()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(())
    }

    /// The receiving end decides whether to make a sound.
    async fn play_cue(&self) {}
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
