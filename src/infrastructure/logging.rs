//! Logging setup: console plus a non-blocking daily file in the log
//! directory. The writer guard lives for the process so buffered lines
//! survive until exit.

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "dex-top-traders.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dex_top_traders=info"));

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(ChronoUtc::new("%H:%M:%S%.3f".to_string())),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer)
                .with_timer(ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f".to_string())),
        )
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    let _ = LOG_GUARD.set(guard);
    Ok(())
}
