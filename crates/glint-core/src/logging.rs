//! `tracing-subscriber` setup shared by binaries, tests and benches.

use tracing_subscriber::EnvFilter;

/// Default filter: verbose for our crates, quiet for the GPU and font stacks.
pub const DEFAULT_FILTER: &str =
    "debug,wgpu_core=info,wgpu_hal=info,naga=info,cosmic_text=info,fontdb=warn";

/// Install a fmt subscriber using `RUST_LOG` if set, [`DEFAULT_FILTER`] otherwise.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Install a fmt subscriber with an explicit filter directive.
///
/// Unlike [`init`] this does not panic when a global subscriber is already
/// installed, which makes it safe to call from several tests.
pub fn init_with_filter(directive: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_test_writer()
        .try_init();
}
