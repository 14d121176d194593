//! Wave Survival - Elemental Wave-Survival Simulation
//!
//! The simulation core of a wave-survival game: wave scheduling, enemy
//! spawning and steering, ten elements with their status effects, damage
//! resolution, upgrades, and the per-frame combat loop that ties them
//! together.
//!
//! This library exposes the core game modules for testing and reuse.

pub mod cli;
pub mod combat;
pub mod headless;
pub mod states;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use headless::HeadlessRunConfig;
pub use states::play_run::{CombatLoop, Element, RunSummary, UpgradeCatalog};
pub use states::{RunConfig, SessionContext};
