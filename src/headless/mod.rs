//! Headless mode for agentic testing
//!
//! Runs a full wave-survival run without any graphical output. Level-up
//! choices are made by an auto-picker, and the run log is written as JSON
//! when the player dies or the time limit is reached.
//!
//! ## Usage
//!
//! ```bash
//! # Run with a config file
//! cargo run --release -- --headless run_config.json
//!
//! # Run with defaults and a fixed seed
//! cargo run --release -- --seed 42
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "random_seed": 42,
//!   "preferred_elements": ["Electric", "Flame"],
//!   "max_duration_secs": 300,
//!   "reduced_capability": false
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::HeadlessRunConfig;
pub use runner::{auto_pick_index, run_headless_run, simulate_run, RunResult};
