//! Shared helpers for the Obol integration tests.

/// Initialize a test-friendly tracing subscriber.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}
