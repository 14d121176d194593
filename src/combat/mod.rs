//! Combat system
//!
//! Shared event types and logging for runs:
//! - Gameplay events (`RunEvent`) emitted by the combat loop
//! - Presentation cues forwarded as Bevy events
//! - The combat log and its JSON export

use bevy::prelude::*;

pub mod events;
pub mod log;
pub mod systems;

use crate::states::play_run::presentation::PresentationEvent;
use crate::states::play_run::systems::RunSystemPhase;
use events::RunEvent;
use systems::*;

/// Plugin for run events and the combat log
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Run events
            .add_event::<RunEvent>()
            .add_event::<PresentationEvent>()
            // Resources
            .init_resource::<log::CombatLog>()
            // Systems
            .add_systems(Update, record_combat_log.after(RunSystemPhase::Presentation));
    }
}
