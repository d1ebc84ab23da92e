//! Tracing subscriber bootstrap.
//!
//! `RUST_LOG` takes precedence over the level passed in. Initialization runs
//! at most once per process; later calls are no-ops.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<bool> = OnceCell::new();

/// Install the fmt subscriber. Returns `false` when another subscriber was
/// already set as the global default.
pub fn init_tracing(default_level: &str) -> bool {
    *TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(level = default_level, "Tracing initialized");
        }
        installed
    })
}
