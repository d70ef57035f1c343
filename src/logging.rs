//! File-based logging for the playback core
//!
//! Embedders that want the core's diagnostics on disk call [`init_logging`]
//! once; everything else just emits `tracing` events into whatever subscriber
//! the host installed.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

/// Initialize the logging system.
///
/// Logs are written to `<dir>/<file_prefix>.YYYY-MM-DD` with daily rotation.
/// `RUST_LOG` overrides the configured filter. The returned guard flushes the
/// writer on drop and must be kept alive by the caller.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    if !config.dir.exists() {
        std::fs::create_dir_all(&config.dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &config.dir, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", config.dir.display());

    Ok(guard)
}

/// Log the settlement of a play request
#[macro_export]
macro_rules! log_play_result {
    ($item:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(item = $item, "Play request settled"),
            Err(e) => tracing::warn!(item = $item, error = %e, "Play request rejected"),
        }
    };
}
