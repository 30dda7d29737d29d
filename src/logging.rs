use std::path::Path;

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;

const LOG_PREFIX: &str = "streakr";

/// Route `tracing` output to daily-rotated files under `<data_dir>/logs`.
///
/// Nothing is written to stdout: the terminal UI owns it.
pub fn enable_logging(data_dir: &Path, log_level: Option<LevelFilter>) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(5)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(data_dir.join("logs"))?;

    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    let filter = match log_level {
        Some(level) => EnvFilter::new(format!("{crate_name}={level}")),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{crate_name}=info"))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(appender)
        .init();
    Ok(())
}
