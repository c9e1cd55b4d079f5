const HOST: &str = "QUERYWATCH_HOST";

const DEFAULT_HOST: &str = "http://localhost:5000";

/// Base URL for deep links, from the environment or the default.
pub fn get_host() -> String {
    std::env::var(HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string())
}

/// Initialize the global tracing subscriber for embedders and tests.
pub fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
