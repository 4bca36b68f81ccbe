//! Logging initialization for the CLI.
//!
//! Diagnostics go to stderr so that stdout carries only the report.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crate target used for the verbose directive
const CRATE_TARGET: &str = "puppetfile_check";

/// Build the filter: `RUST_LOG` if set, otherwise `warn`, with this crate
/// raised to DEBUG when verbose.
fn build_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if !verbose {
        return filter;
    }
    match format!("{CRATE_TARGET}=debug").parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

/// Initialize the tracing subscriber.
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}
