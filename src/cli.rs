//! CLI argument parsing module for puppetfile-check

use crate::manifest::DEFAULT_MANIFEST;
use crate::registry::FORGE_API_URL;
use clap::Parser;
use std::path::PathBuf;

/// Parse a worker limit, rejecting zero
fn parse_concurrency(s: &str) -> Result<usize, String> {
    let value: usize = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", s))?;
    if value == 0 {
        return Err("concurrency must be at least 1".to_string());
    }
    Ok(value)
}

/// Check a Puppetfile against Puppet Forge release metadata
#[derive(Parser, Debug, Clone)]
#[command(
    name = "puppetfile-check",
    version,
    about = "Check Puppetfile pins and dependencies against the Puppet Forge"
)]
pub struct CliArgs {
    /// Puppetfile to check
    #[arg(default_value = DEFAULT_MANIFEST)]
    pub path: PathBuf,

    // General options
    /// Enable verbose output and debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - only the verdict line, no progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Check even if the Puppetfile is not staged in git
    #[arg(long)]
    pub force: bool,

    // Output options
    /// List every checked module, not only those with problems
    #[arg(short = 'i', long)]
    pub include_info: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    // Registry options
    /// Puppet Forge API base URL
    #[arg(long, env = "PUPPET_FORGE_URL", default_value = FORGE_API_URL)]
    pub forge_url: String,

    /// Maximum concurrent Forge requests (default: CPU count, capped at 16)
    #[arg(short = 'j', long, value_parser = parse_concurrency)]
    pub concurrency: Option<usize>,

    /// Retries for failed Forge requests
    #[arg(long, default_value_t = 0)]
    pub retries: u32,
}
