use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` (e.g. `info`, `debug`)
/// applies to every target. Span close events are printed so each request
/// ends with a line carrying its status and latency.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
