//! puppetfile-check - Puppetfile consistency checker CLI tool
//!
//! Compares each module pinned in a Puppetfile with the Puppet Forge:
//! - Is the pinned tag the latest release?
//! - Are the release's dependencies declared at satisfying versions?

use clap::Parser;
use puppetfile_check::cli::CliArgs;
use puppetfile_check::error::AppError;
use puppetfile_check::gate::{ChangeGate, GitChangeGate};
use puppetfile_check::logging;
use puppetfile_check::manifest::load_manifest;
use puppetfile_check::output::{create_formatter, OutputConfig, OutputFormat};
use puppetfile_check::progress::Progress;
use puppetfile_check::reconcile::{ReconcileConfig, Reconciler};
use puppetfile_check::registry::{self, ForgeAdapter, HttpClient};
use puppetfile_check::report::Report;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;

/// Exit code for a terminal error (unreadable manifest, bad configuration)
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Build the reconciler from CLI options
fn build_reconciler(args: &CliArgs) -> Result<Reconciler, AppError> {
    let client = HttpClient::new()?.with_max_retries(args.retries);
    let adapter = ForgeAdapter::with_base_url(client, &args.forge_url)?;
    let config = match args.concurrency {
        Some(limit) => ReconcileConfig::new(limit)?,
        None => ReconcileConfig::default(),
    };
    debug!(forge = %args.forge_url, concurrency = config.concurrency, "reconciler configured");
    Ok(Reconciler::new(Arc::new(adapter), config))
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("puppetfile-check v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    // Only check when the Puppetfile is part of the commit
    if !args.force && !GitChangeGate::new().is_staged(&args.path) {
        println!("No changes to Puppetfile, skipping dependency check.");
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = load_manifest(&args.path)?;
    let reconciler = build_reconciler(&args)?;

    let output_config = OutputConfig {
        color: io::stdout().is_terminal(),
        ..OutputConfig::from_cli(args.json, args.verbose, args.quiet)
    };

    let trusted = parsed
        .manifest
        .iter()
        .filter(|entry| registry::is_trusted_source(&entry.source_url))
        .count();
    let mut progress = Progress::new(
        !args.quiet && output_config.format == OutputFormat::Text && io::stderr().is_terminal(),
    );
    progress.start(trusted as u64, "Fetching Forge metadata");

    let reconciliation = reconciler
        .run_with_progress(&parsed.manifest, |module| progress.fetched(module))
        .await;
    progress.finish_and_clear();

    let report = Report::assemble(reconciliation, parsed.invalid_tags, args.include_info);

    // Output results
    let formatter = create_formatter(output_config);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.verdict.is_pass() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
