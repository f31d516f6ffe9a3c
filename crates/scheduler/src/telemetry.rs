use tracing_subscriber::EnvFilter;

/// Install a process-wide fmt subscriber. `RUST_LOG` wins over the supplied
/// default; calling twice is harmless.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
