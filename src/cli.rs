//! Command-line interface for the wave-survival simulator
//!
//! Every run is headless; the config file is optional.

use clap::Parser;
use std::path::PathBuf;

/// Elemental wave-survival simulator
#[derive(Parser, Debug)]
#[command(name = "wave_survival")]
#[command(about = "Elemental wave-survival simulator")]
#[command(version)]
pub struct Args {
    /// Run with the specified JSON config file (defaults apply when omitted)
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the run log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum game time in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
