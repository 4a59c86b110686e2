//! Development-time tracing.
//!
//! Diagnostics go to stderr and are never persisted. The durable record of
//! what happened is the receipt log (`io/receipt_log`), which `RUST_LOG` does
//! not affect.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
fn default_directive(verbose: bool) -> &'static str {
    if verbose { "cellguard=debug" } else { "warn" }
}

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects
/// `cellguard=debug` over the quiet `warn` default.
///
/// # Example
/// ```bash
/// RUST_LOG=cellguard=info cellguard classify 42 2 -1
/// ```
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
