use std::io;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the filter: RUST_LOG wins, otherwise the configured level
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing to stderr. Safe to call more than once; only the
/// first call installs a subscriber.
pub fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact();

    let installed = tracing_subscriber::registry()
        .with(build_filter(default_level))
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(target: "logging", "Logging initialized at '{}'", default_level);
    }
}

/// Convenience macros for common operations
#[macro_export]
macro_rules! trace_event {
    ($event:expr) => {
        tracing::trace!(target: "table_event", "Event: {:?}", $event);
    };
}
