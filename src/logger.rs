use tracing_subscriber::prelude::*;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
};

/// Install the global `tracing` subscriber for command-line use.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. With a debug filter
/// the decode spans also report their timing on close.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let is_debug = env_filter.to_string().contains("debug")
        || env_filter.to_string().contains("trace");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_writer(std::io::stderr)
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
