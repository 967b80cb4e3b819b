// 📝 Logging - tracing subscriber setup
//
// Logs go to stderr so the shopping list on stdout stays clean.
// RUST_LOG overrides the default level (info), e.g. RUST_LOG=shopping_list=debug

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber (binary only)
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Verbose subscriber for tests; safe to call more than once
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
