// src/logging.rs
// =============================================================================
// Sets up the tracing subscriber for the binary.
//
// - RUST_LOG is honoured when set
// - otherwise the level is INFO, or DEBUG with --verbose
// - everything goes to stderr, stdout is reserved for search results
// =============================================================================

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {}", e);
    }
}
