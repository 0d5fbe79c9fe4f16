//! Logging setup using tracing
//!
//! Records go to a daily-rolling file through a non-blocking writer, and
//! optionally to stderr for front-ends attached to a console. The filter is
//! read from `BOARDLAB_LOG`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{Error, Result, ResultExt};

/// Environment variable controlling the log filter
pub const LOG_ENV: &str = "BOARDLAB_LOG";

const DEFAULT_FILTER: &str = "warn,boardlab_app=info,boardlab_core=info";
const LOG_FILE_PREFIX: &str = "boardlab.log";

/// Where log records go
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Log directory; `None` uses `<data dir>/boardlab/logs`
    pub directory: Option<PathBuf>,
    /// Mirror records to stderr
    pub stderr: bool,
}

/// Flushes buffered records when dropped
#[must_use = "dropping the guard stops file logging"]
#[derive(Debug)]
pub struct LogGuard {
    _worker: WorkerGuard,
    directory: PathBuf,
}

impl LogGuard {
    /// Directory holding the rolling log files
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit.
///
/// # Examples
/// ```bash
/// BOARDLAB_LOG=debug my-frontend
/// BOARDLAB_LOG=boardlab_app=trace my-frontend
/// ```
pub fn init(options: LogOptions) -> Result<LogGuard> {
    let directory = options.directory.unwrap_or_else(default_log_directory);
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create log directory {:?}", directory))?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &directory, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(timer());

    let stderr_layer = options.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(timer())
    });

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| Error::config(format!("Logging already initialized: {e}")))?;

    tracing::info!(directory = %directory.display(), "Board Lab logging started");

    Ok(LogGuard {
        _worker: worker,
        directory,
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn timer() -> fmt::time::ChronoLocal {
    fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string())
}

fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("boardlab")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directory_is_namespaced() {
        assert!(default_log_directory().ends_with("boardlab/logs"));
    }

    #[test]
    fn test_init_creates_directory_once() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("logs");

        let guard = init(LogOptions {
            directory: Some(dir.clone()),
            stderr: false,
        })
        .unwrap();
        assert!(dir.is_dir());
        assert_eq!(guard.directory(), dir.as_path());

        let second = init(LogOptions {
            directory: Some(dir),
            stderr: true,
        });
        assert!(matches!(second, Err(Error::Config { .. })));
    }
}
