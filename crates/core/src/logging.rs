use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Directory under `$HOME` that receives rolling log files.
pub const LOG_DIR: &str = ".scanscope/logs";

/// Environment variable holding the filter directives, e.g. `scanscope_core=debug`.
pub const LOG_ENV: &str = "SCANSCOPE_LOG";

pub fn log_dir(home: Option<&str>) -> PathBuf {
    Path::new(home.unwrap_or(".")).join(LOG_DIR)
}

/// Installs a daily rolling `<component>.log.<date>` writer, plus a colored
/// stderr copy when `to_stderr` is set. Keep the guard alive until exit.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir(std::env::var("HOME").ok().as_deref());
    let _ = std::fs::create_dir_all(&dir);

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    // Embedding hosts and tests may already own the global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(stderr)
        .try_init();

    guard
}
