//! Stderr log backend for `--debug`
//!
//! The library logs through the `log` facade; the subscriber's log bridge
//! picks those records up so `RUST_LOG` can narrow them per category.

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. Later calls are ignored.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
