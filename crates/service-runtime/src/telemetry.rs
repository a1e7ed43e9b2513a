//! Logging setup.

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global `fmt` subscriber filtered by `level`.
///
/// An unparsable directive falls back to `info`. Calling this twice keeps
/// the first subscriber.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("invalid LOG_LEVEL {:?} ({}), using info", level, e);
        EnvFilter::new("info")
    });
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
