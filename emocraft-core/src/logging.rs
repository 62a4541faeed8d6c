//! Logging setup and span names.
//!
//! The library only emits `tracing` events; embedding applications (and the
//! benchmarks) call [`init`] once to get formatted output.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber at `level`.
///
/// `RUST_LOG` overrides `level` when set. Returns `false` when a global
/// subscriber was already installed, which is left in place.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Subscriber already installed, keeping it");
            false
        }
    }
}

/// Span names used with `tracing::*_span!`.
pub mod spans {
    /// Full graph build from a rule table.
    pub const BUILD: &str = "emocraft::build";
    /// Level and base-component recomputation.
    pub const FINALIZE: &str = "emocraft::finalize";
    /// Weighted base-ratio traversal.
    pub const RATIOS: &str = "emocraft::ratios";
}
