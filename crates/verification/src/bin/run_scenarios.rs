//! Scenario runner binary
//!
//! Runs one or more YAML scenario manifests on a single device and prints a
//! ✓/✗ line per scenario.

use clap::Parser;
use std::path::PathBuf;
use texfill::{Backend, GpuContext};
use texfill_scenario::Scenario;
use texfill_verification::harness::{self, FillRequest};

/// Command-line arguments for the scenario runner
#[derive(Parser)]
#[command(version, about = "Run texture fill scenarios")]
struct Args {
    /// Scenario manifest files (.yaml)
    #[arg(required = true)]
    scenarios: Vec<PathBuf>,

    /// Graphics backend (auto, vulkan, metal, dx12, gl)
    #[arg(long, short, default_value = "auto")]
    backend: Backend,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    let subscriber = tracing_subscriber::fmt().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let context = GpuContext::new(args.backend).await?;

    let mut failures = 0;
    for path in &args.scenarios {
        let scenario = match Scenario::from_file(path) {
            Ok(scenario) => scenario,
            Err(e) => {
                eprintln!("✗ Error loading scenario {}: {e}", path.display());
                failures += 1;
                continue;
            }
        };
        let name = &scenario.name;

        let request = match FillRequest::from_scenario(&scenario) {
            Ok(request) => request,
            Err(e) => {
                eprintln!("✗ Error preparing scenario {name}: {e}");
                failures += 1;
                continue;
            }
        };

        let outcome = match harness::run(&context, &request) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("✗ Error running scenario {name}: {e}");
                failures += 1;
                continue;
            }
        };

        let fill_duration = outcome.fill_duration;
        let verify_duration = outcome.verify_duration;
        match outcome.total_mismatches() {
            _ if !outcome.verified() => println!("- Scenario {name} filled without verification (fill: {fill_duration:.2?})"),
            0 => println!("✓ Scenario {name} matches (fill: {fill_duration:.2?}, verify: {verify_duration:.2?})"),
            mismatches => {
                eprintln!("✗ Scenario {name}: {mismatches} mismatched texels");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} scenarios failed", args.scenarios.len()).into());
    }

    Ok(())
}
