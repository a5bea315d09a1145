//! Shared `tracing` subscriber bootstrap for the demo binaries.

/// Initializes a compact, env-filtered `tracing` subscriber.
///
/// Honors `RUST_LOG`, defaulting to `info` when unset.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .compact()
        .init();
}
