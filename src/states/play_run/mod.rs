//! Play Run - Wave Survival Simulation
//!
//! The simulation core of a single run: the player fights escalating waves of
//! enemies, picks an element on the first level-up, and stacks upgrades on
//! every level-up after that.
//!
//! ## Pieces
//! - **Waves** (`waves`, `spawner`): wave sizes, boss waves every fifth wave,
//!   staggered spawns and the one-shot completion check
//! - **Enemies** (`enemy_ai`, `arena`): heading-based steering, status
//!   overrides (frozen, confused, feared), end-of-frame compaction
//! - **Elements** (`elements`, `elemental_effects`, `status_effects`): ten
//!   elements mapped onto ten status conditions with their own tick rules
//! - **Damage** (`damage`): vulnerabilities, crits, tank armor, life steal,
//!   thorns
//! - **Upgrades** (`upgrade_config`, `upgrades`): RON catalog, option pools,
//!   stack-aware stat application
//! - **Orchestration** (`combat_loop`, `timers`, `attacks`): the per-frame
//!   update, cancellable timed events, and the five attack patterns
//!
//! ## Flow
//! 1. A host builds a `CombatLoop` from a `RunConfig`, a `SessionContext`, the
//!    `UpgradeCatalog` and a seeded `GameRng`
//! 2. `systems::add_core_run_systems` drives `CombatLoop::update` every frame
//! 3. Level-up choices pause the loop until `CombatLoop::select_choice`
//! 4. Player death cancels pending timers and records a `RunSummary`

pub mod arena;
pub mod attacks;
pub mod combat_loop;
pub mod components;
pub mod constants;
pub mod damage;
pub mod elemental_effects;
pub mod elements;
pub mod enemy_ai;
pub mod presentation;
pub mod spawner;
pub mod status_effects;
pub mod systems;
pub mod timers;
pub mod upgrade_config;
pub mod upgrades;
pub mod waves;

// Re-exports
pub use combat_loop::{CombatLoop, FrameInput, RunStatus, RunSummary};
pub use components::{Enemy, EnemyId, EnemyKind, GameRng, Player};
pub use elements::{AttackMode, Element};
pub use upgrade_config::{load_upgrade_catalog, UpgradeCatalog, UpgradeConfigPlugin};
pub use upgrades::{LevelUpChoice, UpgradeEngine, UpgradeId};
pub use waves::WaveScheduler;
