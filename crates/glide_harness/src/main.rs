//! glide-headless - run a panel scenario and write its report

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use glide_harness::{init_logging, run_loaded_scenario, HeadlessRunConfig, HeadlessScenario};
use tracing::info;

/// Run a scripted floating-panel scenario headlessly
#[derive(Parser, Debug)]
#[command(name = "glide-headless")]
#[command(about = "Run a scripted floating-panel scenario headlessly")]
#[command(version)]
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Write the JSON report to this relative path instead of stdout
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Logical milliseconds per frame
    #[arg(long, default_value = "16")]
    tick_ms: u64,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log: String,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args.log);

    info!("Running scenario: {}", args.scenario.display());
    let scenario = HeadlessScenario::from_path(&args.scenario)?;
    let outcome = run_loaded_scenario(
        &scenario,
        HeadlessRunConfig {
            tick_ms: args.tick_ms,
            ..HeadlessRunConfig::default()
        },
    )?;

    match &args.report {
        Some(path) => outcome.report().write_to_path(path)?,
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
