//! deptrim - removes redundant transitive PackageReferences from .NET projects
//!
//! A reference is redundant when another declared reference already brings
//! the package in through its dependency closure and the compiled output does
//! not reference an assembly of the same name.

use clap::Parser;
use deptrim::cli::CliArgs;
use deptrim::orchestrator::{Orchestrator, OrchestratorError};
use deptrim::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; RUST_LOG takes precedence over --verbose
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("deptrim v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
        eprintln!("Configuration: {}", args.configuration);
        if args.dry_run {
            eprintln!("Mode: dry-run");
        }
    }

    let orchestrator = Orchestrator::new(args.clone())?;
    let result = orchestrator.run().await;

    // Nothing was analyzed when the path itself is unusable
    if let Some(error) = result
        .errors
        .iter()
        .find(|e| matches!(e, OrchestratorError::DetectionError(_)))
    {
        anyhow::bail!("{}", error);
    }

    let mut output_config =
        OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.dry_run);
    output_config.color = io::stdout().is_terminal();
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    if result.has_errors() {
        // Partial success: the remaining projects were still processed
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
