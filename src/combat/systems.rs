//! Combat systems
//!
//! ECS systems that record run events.

use bevy::prelude::*;

use super::events::RunEvent;
use super::log::CombatLog;
use crate::states::play_run::combat_loop::CombatLoop;

/// Record run events to the combat log, stamped with game time.
pub fn record_combat_log(
    mut combat_log: ResMut<CombatLog>,
    run: Option<Res<CombatLoop>>,
    mut run_events: EventReader<RunEvent>,
) {
    if let Some(run) = run {
        combat_log.run_time = run.clock() / 1000.0;
    }

    for event in run_events.read() {
        combat_log.log_run_event(event);
    }
}
