//! Tracing subscriber bootstrap.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Installation failure
/// (usually a subscriber already installed by a test harness or host) is
/// reported and otherwise ignored.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}
