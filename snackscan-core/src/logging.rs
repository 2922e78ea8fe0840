//! Logging for snackscan
//!
//! The CLI logs to a daily rolling file at `$XDG_STATE_HOME/snackscan/snackscan.log`;
//! stdout stays reserved for command output. `RUST_LOG` overrides the
//! configured level.

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Install the file subscriber. Keep the returned guard alive until exit.
pub fn init(config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_path = Config::log_path();
    let (log_dir, prefix) = match (log_path.parent(), log_path.file_name()) {
        (Some(dir), Some(name)) => (dir.to_path_buf(), name.to_string_lossy().into_owned()),
        _ => {
            return Err(Error::Config(format!(
                "invalid log path {}",
                log_path.display()
            )))
        }
    };
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(config.max_files.max(1))
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("failed to create log appender: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(level_filter(config))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| Error::Config(format!("failed to install subscriber: {}", e)))?;

    tracing::info!(log = %log_path.display(), level = %config.level, "Logging initialized");
    if EnvFilter::try_new(&config.level).is_err() {
        tracing::warn!(
            level = %config.level,
            "Invalid log level in config, using {}",
            DEFAULT_LEVEL
        );
    }

    Ok(LoggingGuard { _guard: guard })
}

/// Route logs to the test harness output. Safe to call from every test.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flushes buffered log lines when dropped.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// `RUST_LOG` if set, else the configured level; an unparseable level means `info`.
fn level_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_is_used() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "debug".to_string(),
            ..Default::default()
        };
        assert_eq!(level_filter(&config).to_string(), "debug");
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = LoggingConfig {
            level: "snackscan=loud".to_string(),
            ..Default::default()
        };
        assert_eq!(level_filter(&config).to_string(), DEFAULT_LEVEL);
    }
}
