//! nuget-outdated - reports outdated NuGet dependencies of a .NET project
//!
//! Exit codes: 0 on success, 1 on a fatal error, 2 when `--fail-on-updates`
//! is set and an outdated dependency was found.

use anyhow::Context;
use clap::Parser;
use nuget_outdated::cli::CliArgs;
use nuget_outdated::config::OutdatedOptions;
use nuget_outdated::orchestrator::Orchestrator;
use nuget_outdated::output::write_result;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// RUST_LOG overrides the filter derived from --verbose / --quiet
fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let (project, options) = OutdatedOptions::for_project(&args)?;
    let options = Arc::new(options);
    debug!("nuget-outdated v{} on {}", env!("CARGO_PKG_VERSION"), project.display());

    let orchestrator = Orchestrator::new(Arc::clone(&options))?;
    let result = orchestrator.run(&project).await?;

    write_result(&result, &options).with_context(|| match options.output {
        Some(ref path) => format!("failed to write report to {}", path.display()),
        None => "failed to write report".to_string(),
    })?;

    if result.should_fail(&options) {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}
