//! Log output for test runs.
//!
//! The library only emits `tracing` events; binaries and test suites call
//! [`init_logging`] once to print them. Filtering follows `RUST_LOG` and
//! defaults to `info`.

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<bool> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install a global fmt subscriber writing to stderr.
///
/// Returns whether the subscriber got installed. Only the first call does
/// any work; later calls report the first outcome. A subscriber installed
/// elsewhere is left in place.
pub fn init_logging(json: bool) -> bool {
    *INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false);
        let installed = if json {
            builder.json().try_init().is_ok()
        } else {
            builder.try_init().is_ok()
        };
        if installed {
            tracing::debug!(json, "logging initialised");
        }
        installed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let first = init_logging(false);
        let second = init_logging(true);
        assert_eq!(first, second);
        tracing::info!("visible when RUST_LOG allows");
    }
}
