//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise `default_filter`.
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(default_filter, "Tracing initialized");
    }
}
