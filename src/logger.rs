//! File logging with daily rotation in the local timezone.

use anyhow::{Result, anyhow};
use logroller::{LogRollerBuilder, Rotation, RotationAge, TimeZone};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::prelude::*;

use crate::config::Config;

/// Log files are named `basket-miner.YYYY-MM-DD`.
const LOG_PREFIX: &str = "basket-miner";

/// Rotated files kept on disk.
const KEEP_DAYS: u64 = 3;

/// Environment variable overriding the default `debug` filter.
const FILTER_ENV: &str = "BASKET_MINER_LOG";

/// Install the global subscriber writing to `config.log_path`.
///
/// The returned guard flushes buffered lines on drop; hold it until exit.
pub fn init(config: &Config) -> Result<WorkerGuard> {
    fs::create_dir_all(&config.log_path)?;
    cleanup_old_logs(&config.log_path)?;

    let roller = LogRollerBuilder::new(config.log_path.as_path(), Path::new(LOG_PREFIX))
        .rotation(Rotation::AgeBased(RotationAge::Daily))
        .time_zone(TimeZone::Local)
        .max_keep_files(KEEP_DAYS as _)
        .build()
        .map_err(|e| anyhow!("Failed to create log roller: {e}"))?;
    let (writer, guard) = tracing_appender::non_blocking(roller);

    let offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(
        offset,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    );

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(timer),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to set global subscriber: {e}"))?;

    tracing::debug!(log_path = %config.log_path.display(), "logging initialized");
    Ok(guard)
}

/// Remove our log files last modified more than `KEEP_DAYS` ago.
pub fn cleanup_old_logs(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let cutoff = SystemTime::now() - Duration::from_secs(KEEP_DAYS * 24 * 60 * 60);
    for entry in fs::read_dir(log_path)? {
        let path = entry?.path();
        if is_stale_log(&path, cutoff) {
            let _ = fs::remove_file(&path);
        }
    }
    Ok(())
}

fn is_stale_log(path: &Path, cutoff: SystemTime) -> bool {
    let ours = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(LOG_PREFIX));

    ours && path.is_file()
        && fs::metadata(path)
            .and_then(|m| m.modified())
            .is_ok_and(|modified| modified < cutoff)
}
