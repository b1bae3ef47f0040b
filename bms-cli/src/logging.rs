use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// The filter is read from `RUST_LOG` and defaults to `info`. Logs go to
/// stderr so that stdout carries only the rendered snippets.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
