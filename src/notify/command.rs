//! Local command sink: desktop notification and audio cue via spawned
//! helper commands.

use async_trait::async_trait;
use tracing::debug;

use super::{NotificationSink, NotifyError};
use crate::bus::Alert;
use crate::config::NotifyConfig;

pub struct CommandSink {
    cfg: NotifyConfig,
}

impl CommandSink {
    pub fn new(cfg: NotifyConfig) -> Self {
        Self { cfg }
    }
}

/// Substitute `{title}`, `{body}` and `{icon}` into an argv template.
fn substitute(args: &[String], alert: &Alert, default_icon: &str) -> Vec<String> {
    let icon = alert.icon.as_deref().unwrap_or(default_icon);
    args.iter()
        .map(|a| {
            a.replace("{title}", &alert.title)
                .replace("{body}", &alert.body)
                .replace("{icon}", icon)
        })
        .collect()
}

async fn run(argv: &[String]) -> Result<(), String> {
    let (program, rest) = argv.split_first().ok_or("empty command")?;
    let status = tokio::process::Command::new(program)
        .args(rest)
        .status()
        .await
        .map_err(|e| format!("{program}: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("{program} exited with {status}"))
    }
}

#[async_trait]
impl NotificationSink for CommandSink {
    fn name(&self) -> &str {
        "command"
    }

    async fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        if !self.cfg.enabled {
            return Err(NotifyError::PermissionDenied);
        }
        if self.cfg.notify_command.is_empty() {
            return Err(NotifyError::Delivery("no notifier command configured".into()));
        }
        let argv = substitute(&self.cfg.notify_command, alert, &self.cfg.icon);
        run(&argv).await.map_err(NotifyError::Delivery)
    }

    async fn play_cue(&self) {
        if self.cfg.cue_command.is_empty() {
            return;
        }
        if let Err(e) = run(&self.cfg.cue_command).await {
            debug!(error = %e, "Audio cue failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
