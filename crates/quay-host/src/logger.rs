//! Logging infrastructure for embedding hosts.
//!
//! Resolution itself only emits structured `tracing` events with message
//! fields; formatting them is the host's responsibility. Hosts that do not
//! bring their own subscriber can use this setup, built on the `tracing`
//! ecosystem with environment-based configuration for debugging.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Call once at host startup, before resolution begins. The logging level
/// is determined in this order:
/// 1. `verbose`: DEBUG for the quay crates
/// 2. `quiet`: errors only
/// 3. `RUST_LOG` environment variable: custom filter
/// 4. Default: INFO for the quay crates
pub fn init(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("quay_manifest=debug,quay_graph=debug,quay_host=debug")
    } else if quiet {
        EnvFilter::new("quay_host=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("quay_manifest=info,quay_graph=info,quay_host=info")
        })
    };
    init_with_filter(filter);
}

/// Initialize with a custom environment filter, for hosts that need
/// precise control over log filtering.
pub fn init_with_filter(filter: EnvFilter) {
    let fmt_layer = fmt::layer()
        .with_target(false) // Don't show the module path (keeps output clean)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
