//! Log subscriber setup for hosts that do not install their own.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "info,meridian_client=debug,meridian_store=info,sqlx=warn";

/// Installs a fmt subscriber filtered by `MERIDIAN_LOG`, then `RUST_LOG`,
/// then a built-in default.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("MERIDIAN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
