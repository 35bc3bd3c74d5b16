use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Loads variables from a `.env` file when one exists and returns its path.
///
/// Runs before tracing is installed, so the caller logs the result.
pub fn init_env() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Installs the fmt subscriber. `RUST_LOG` takes precedence over `default_level`.
///
/// Logs go to stderr; stdout is reserved for command output.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
