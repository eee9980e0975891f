//! Alert bus: decouples the scheduling engine from the notification sinks.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Alert types
// ---------------------------------------------------------------------------

/// A single notification to present: visual alert plus audible cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Alert for an interval-mode firing.
    pub fn repeating(label: &str) -> Self {
        Self::new(format!("\u{1F501} {label}"), format!("Reminder: {label}"))
    }

    /// Alert for a one-shot calendar firing.
    pub fn one_shot(label: &str) -> Self {
        Self::new(format!("\u{1F514} {label}"), format!("Reminder: {label}"))
    }
}

/// Remote-origin push payload, `{"notification": {"title", "body", "icon"}}`.
/// Rendered through the same sink path as locally computed firings; the
/// transport that delivers it is out of scope here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushPayload {
    #[serde(default)]
    pub notification: PushNotification,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushNotification {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl PushPayload {
    /// Convert to an [`Alert`], filling defaults for missing fields.
    pub fn into_alert(self) -> Alert {
        let n = self.notification;
        Alert {
            title: n.title.unwrap_or_else(|| "Reminder".into()),
            body: n.body.unwrap_or_else(|| "You have a reminder.".into()),
            icon: n.icon,
        }
    }
}

// ---------------------------------------------------------------------------
// AlertBus
// ---------------------------------------------------------------------------

/// Capacity of the broadcast channel.
const BUS_CAPACITY: usize = 64;

/// Fan-out bus from the reconciler to the sinks. Each sink subscribes and
/// runs its own delivery loop; publishing never blocks on slow sinks.
#[derive(Debug)]
pub struct AlertBus {
    tx: broadcast::Sender<Alert>,
}

impl AlertBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Publish an alert. Dropped silently when no sink is subscribed.
    pub fn publish(&self, alert: Alert) {
        let _ = self.tx.send(alert);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Alert> {
        self.tx.subscribe()
    }
}

impl Default for AlertBus {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
