use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Store config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Base URL of the remote document store. Empty disables remote sync
    /// and the app runs purely on the local cache.
    #[serde(default)]
    pub remote_url: String,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    /// Optional bearer token for the remote store.
    #[serde(default)]
    pub auth_token: String,
    /// How often the daemon re-reads the authoritative day document.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_user_id() -> String {
    "default".into()
}
fn default_refresh_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            remote_url: String::new(),
            user_id: default_user_id(),
            auth_token: String::new(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Notify config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyConfig {
    /// Whether visual alerts may be shown at all. The daemon treats
    /// `false` like a denied notification permission: alerts are
    /// skipped, cues still play.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Icon attached to every alert.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Command (argv) for the visual alert; `{title}`, `{body}` and
    /// `{icon}` are substituted into the arguments.
    #[serde(default = "default_notify_command")]
    pub notify_command: Vec<String>,
    /// Command (argv) for the audible cue. Empty disables the cue.
    #[serde(default)]
    pub cue_command: Vec<String>,
    /// Optional webhook that receives every alert as a push payload.
    #[serde(default)]
    pub webhook_url: String,
}

fn default_true() -> bool {
    true
}
fn default_icon() -> String {
    "/icon-192.png".into()
}
fn default_notify_command() -> Vec<String> {
    vec!["notify-send".into(), "{title}".into(), "{body}".into()]
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            icon: default_icon(),
            notify_command: default_notify_command(),
            cue_command: Vec::new(),
            webhook_url: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Scheduler config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerConfig {
    /// Clock time used when a task has a recurrence rule but no
    /// reminder time of its own.
    #[serde(default = "default_reminder_time")]
    pub default_reminder_time: String,
    /// Whether the end-of-day rollover posts a summary of unfinished
    /// tasks.
    #[serde(default = "default_true")]
    pub rollover_summary: bool,
}

fn default_reminder_time() -> String {
    "09:00".into()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_reminder_time: default_reminder_time(),
            rollover_summary: default_true(),
        }
    }
}

// ---------------------------------------------------------------------------
// Log config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a daily-rolling log file under the data directory.
    #[serde(default)]
    pub file: bool,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

// ---------------------------------------------------------------------------
// Paths & loading
// ---------------------------------------------------------------------------

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".daylist")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn cache_dir() -> PathBuf {
    config_dir().join("cache")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if p.exists() {
        let text = std::fs::read_to_string(&p)
            .with_context(|| format!("reading config from {}", p.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config from {}", p.display()))?;
        Ok(cfg)
    } else {
        Ok(Config::default())
    }
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(&p, json)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
