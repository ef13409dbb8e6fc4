//! Tracing initialisation for the rengo binary.
//!
//! The subscriber is only installed when `RENGO_LOG` (or `RUST_LOG`) is
//! set, so normal runs pay nothing for it. `RENGO_LOG` wins when both are
//! set and uses `RUST_LOG` filter syntax (e.g. `debug`,
//! `rengo_rename=trace`). All output goes to stderr so it never mixes
//! with rewritten source on stdout.

use tracing_subscriber::EnvFilter;

fn build_filter() -> EnvFilter {
    if let Ok(value) = std::env::var("RENGO_LOG") {
        EnvFilter::builder().parse_lossy(value)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, if logging was requested.
pub fn init_tracing() {
    if std::env::var("RENGO_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
