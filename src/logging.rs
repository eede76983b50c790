//! Tracing setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the report server.
pub const SERVER_FILTER: &str = "strategy_reports=info,tower_http=debug,axum=debug,warn";

/// Default filter for the command-line tools.
pub const CLI_FILTER: &str = "strategy_reports=info,warn";

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` is used.
/// Calling this twice is harmless (the second call is ignored).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
