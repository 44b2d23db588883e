//! Logging configuration with file-based output and size-based rotation.
//!
//! Writes logs to `~/.config/carousel/carousel.log` (or platform equivalent)
//! with 10 MB size-based rotation. The terminal only shows warnings so the
//! prompt stays readable; set `CAROUSEL_DEBUG=1` to see debug output from the
//! carousel crates on both outputs.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,carousel_core=debug,carousel_cli=debug";

/// Initialize logging with dual-output (file + stdout).
///
/// Returns a `WorkerGuard` that must be held for the program lifetime so
/// buffered lines are flushed on exit. Falls back to stdout-only logging
/// (and returns `None`) when the log file cannot be created.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let debug_logging = std::env::var("CAROUSEL_DEBUG").is_ok();

    let log_dir = match dirs::config_dir() {
        Some(config) => config.join("carousel"),
        None => {
            init_stdout_only(debug_logging);
            return None;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        // Subscriber not installed yet
        eprintln!(
            "Failed to create log directory {:?}: {}, using stdout only",
            log_dir, e
        );
        init_stdout_only(debug_logging);
        return None;
    }

    // 10 MB, keep carousel.log and carousel.log.1
    let log_path = log_dir.join("carousel.log");
    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(10 * 1024 * 1024),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Failed to create log file at {:?}: {}", log_path, e);
            init_stdout_only(debug_logging);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(file_filter(debug_logging));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer(debug_logging))
        .init();

    tracing::info!(log_file = ?log_path, debug_logging, "carousel logging initialized");

    Some(guard)
}

fn init_stdout_only(debug_logging: bool) {
    tracing_subscriber::registry()
        .with(stdout_layer(debug_logging))
        .init();

    tracing::info!(debug_logging, "carousel logging initialized (stdout only)");
}

fn stdout_layer<S>(debug_logging: bool) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let directive = if debug_logging { DEBUG_DIRECTIVE } else { "warn" };
    fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_filter(EnvFilter::new(directive))
}

fn file_filter(debug_logging: bool) -> EnvFilter {
    EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" })
}
