//! Subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "project_accessor=info";

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `project_accessor=info`. Calling it twice is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
