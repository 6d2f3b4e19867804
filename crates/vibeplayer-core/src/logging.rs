//! Tracing setup for the player binary.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `verbose` is the number of `-v` flags on the command line: `0` logs
/// warnings and errors, `1` adds info, `2` debug and `3` or more trace.
/// A `RUST_LOG` environment filter, when present, wins over the flag.
pub fn init(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
