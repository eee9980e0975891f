//! Logging initialization.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{log_dir, Config};

/// Initialize the tracing subscriber from config. `RUST_LOG` overrides
/// the configured level. Returns the appender guard that must be kept
/// alive for the lifetime of the process when file logging is on.
pub fn init_logging(cfg: &Config) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("daylist={}", cfg.log.level)));

    let stdout_layer = fmt::layer().with_target(false);

    if cfg.log.file {
        let dir = log_dir();
        std::fs::create_dir_all(&dir)?;
        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("daylist")
            .filename_suffix("log")
            .build(&dir)?;
        let (writer, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .with(file_layer)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .init();
        Ok(None)
    }
}
