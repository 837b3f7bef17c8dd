//! Logging setup for the indicator binary.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`, raised to `debug` when
/// the settings flag asks for it; with debug enabled the `RUST_LOG`
/// environment variable may override the filter. Alongside the console, a
/// persistent `debug.log` is appended under the per-user data directory
/// when one is available.
///
/// Returns the guard that flushes the file writer. The caller keeps it
/// alive for the life of the process.
pub fn init(debug: bool) -> Option<WorkerGuard> {
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        // Allow `RUST_LOG` to override the level when debug logging is
        // enabled.
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let (file_layer, guard) = match log_dir() {
        Some(dir) => {
            let appender = tracing_appender::rolling::never(dir, "debug.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init();

    guard
}

/// Directory holding the persistent log, created on demand. `None` when no
/// per-user data directory exists or it cannot be created; logging then
/// stays console-only.
fn log_dir() -> Option<PathBuf> {
    let dir = dirs_next::data_dir()?.join("ime-color-indicator");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
