//! Log output for headless runs.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber on stderr.
///
/// `RUST_LOG` wins over `default_directive` when it is set. Calling this
/// twice is harmless: the second install is ignored.
pub fn init_logging(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
