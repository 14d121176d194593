//! Run state
//!
//! The simulation core (`play_run`) plus the data a host hands it: per-run
//! configuration and the cross-run session context.

pub mod play_run;
pub mod run_config;
pub mod session;

pub use run_config::RunConfig;
pub use session::SessionContext;
