//! Wave Survival - Elemental Wave-Survival Simulation
//!
//! Runs the simulation headless: loads a run config (or the defaults),
//! applies command-line overrides, and plays until the player falls or the
//! time limit is reached.

use std::process::ExitCode;

use wave_survival::cli;
use wave_survival::headless::{run_headless_run, HeadlessRunConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let mut config = match &args.headless {
        Some(path) => match HeadlessRunConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => HeadlessRunConfig::default(),
    };

    // Command-line overrides
    if let Some(output) = &args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if args.seed.is_some() {
        config.random_seed = args.seed;
    }

    match run_headless_run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error running simulation: {}", e);
            ExitCode::FAILURE
        }
    }
}
