//! Logging setup.
//!
//! The library only emits `tracing` events; hosts decide whether to install
//! a subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a formatted subscriber.
///
/// Level filter comes from `RUST_LOG` (default: `info`), e.g.
/// `RUST_LOG=dental_chart_core=debug`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber writing through the test harness.
///
/// Safe to call from every test; only the first call installs.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
