//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_FILE: &str = "rsettings.log";

/// Initialize the logging subsystem
///
/// Logs are written to `~/.local/share/reporter-settings/logs/` so that the
/// terminal stays reserved for command output.
/// Log level is controlled by `RSETTINGS_LOG` environment variable.
///
/// # Examples
/// ```bash
/// RSETTINGS_LOG=debug rsettings show
/// RSETTINGS_LOG=rsettings_host=trace rsettings set appURL=http://grafana:3000
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE);

    let env_filter = EnvFilter::try_from_env("RSETTINGS_LOG").unwrap_or_else(|_| {
        EnvFilter::new("reporter_settings=info,rsettings_app=info,rsettings_host=info,warn")
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("reporter-settings starting, log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> Result<PathBuf> {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    Ok(base.join("reporter-settings").join("logs"))
}

/// Get the log file path for the current day
pub fn get_current_log_file() -> Result<PathBuf> {
    let dir = get_log_directory()?;
    Ok(dir.join(LOG_FILE))
}
