//! Logging setup for `issuetrackd`.
//!
//! `RUST_LOG` wins when set; otherwise the `-v`/`-q` flags pick the
//! default filter level.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
pub fn init(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
