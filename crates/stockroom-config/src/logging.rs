// ── Tracing initialisation ──
//
// `RUST_LOG` wins over the configured level. With `logging.file` set, logs
// go through a non-blocking file appender and the returned guard must be
// held until shutdown so buffered lines are flushed.

use std::ffi::OsStr;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{ConfigError, LoggingConfig};

/// Parse a configured level into a filter.
pub fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(level.trim()).map_err(|e| ConfigError::Validation {
        field: "logging.level".into(),
        reason: format!("'{level}' is not a valid filter directive ({e})"),
    })
}

/// Split a log file path into the directory and file name the appender wants.
fn file_target(path: &Path) -> (&Path, &OsStr) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path.file_name().unwrap_or(OsStr::new("stockroom.log"));
    (dir, name)
}

/// Install the global subscriber.
///
/// Returns the appender guard when logging to a file, `None` for stderr.
pub fn init_tracing(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| build_filter(&cfg.level))?;

    match &cfg.file {
        Some(path) => {
            let (dir, name) = file_target(path);
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .try_init()
                .map_err(|e| ConfigError::Logging(e.to_string()))?;

            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()
                .map_err(|e| ConfigError::Logging(e.to_string()))?;

            Ok(None)
        }
    }
}
