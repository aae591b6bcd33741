use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Sets up logging to stderr.  The level defaults to `info`, and can be
/// overridden with `RUST_LOG`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);

    // Ignore failure: a subscriber may already be installed (e.g. in tests).
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
