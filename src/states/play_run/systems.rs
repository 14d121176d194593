//! Run Systems API
//!
//! Stable entry point for hosting a `CombatLoop` inside a Bevy app. Both the
//! headless runner and any graphical front end add the same systems from
//! here.
//!
//! ## System Phases
//!
//! 1. **Simulation** - advance the combat loop by one frame
//! 2. **Presentation** - forward queued cues and gameplay events to Bevy events
//!
//! ## Usage
//!
//! ```ignore
//! use crate::states::play_run::systems;
//!
//! systems::configure_run_system_ordering(&mut app);
//! systems::add_core_run_systems(&mut app, resource_exists::<CombatLoop>);
//! ```

use bevy::prelude::*;

use crate::combat::events::RunEvent;

pub use super::combat_loop::{CombatLoop, FrameInput, RunStatus, RunSummary};
pub use super::components::GameRng;
pub use super::presentation::{PresentationEvent, PresentationSink};

/// Host input for the next frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct RunInput {
    pub movement: Vec2,
    /// Set by the host; consumed (toggles pause) on the next frame.
    pub pause_requested: bool,
}

/// When set, every frame advances the game clock by this many milliseconds
/// instead of the real frame time. Used for deterministic headless runs.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedFrameStep(pub f64);

/// 60 frames per second.
pub const DEFAULT_FRAME_STEP_MS: f64 = 1000.0 / 60.0;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunSystemPhase {
    /// Phase 1: one combat loop frame
    Simulation,
    /// Phase 2: presentation cues and run events out to Bevy
    Presentation,
}

/// Configures the ordering between run system phases.
pub fn configure_run_system_ordering(app: &mut App) {
    app.configure_sets(
        Update,
        (RunSystemPhase::Simulation, RunSystemPhase::Presentation).chain(),
    );
}

/// Adds the systems that drive a `CombatLoop` resource.
///
/// # Example
/// ```ignore
/// add_core_run_systems(&mut app, || true);
/// ```
pub fn add_core_run_systems<M>(app: &mut App, run_condition: impl Condition<M> + Clone)
where
    M: 'static,
{
    app.add_systems(
        Update,
        advance_combat_loop
            .in_set(RunSystemPhase::Simulation)
            .run_if(run_condition.clone()),
    );

    app.add_systems(
        Update,
        (forward_presentation, forward_run_events)
            .chain()
            .in_set(RunSystemPhase::Presentation)
            .run_if(run_condition),
    );
}

/// Advance the combat loop by one frame.
pub fn advance_combat_loop(
    time: Res<Time>,
    step: Option<Res<FixedFrameStep>>,
    mut input: ResMut<RunInput>,
    mut run: ResMut<CombatLoop>,
) {
    if input.pause_requested {
        input.pause_requested = false;
        run.toggle_pause();
        info!("Run {}", if run.is_paused() { "paused" } else { "resumed" });
    }

    let delta_ms = match step {
        Some(step) => step.0,
        None => time.delta_secs_f64() * 1000.0,
    };
    run.update(
        delta_ms,
        FrameInput {
            movement: input.movement,
        },
    );
}

/// Adapts a Bevy event writer to the presentation sink seam.
struct EventSink<'a, 'w> {
    writer: &'a mut EventWriter<'w, PresentationEvent>,
}

impl PresentationSink for EventSink<'_, '_> {
    fn present(&mut self, event: &PresentationEvent) -> Result<(), String> {
        self.writer.send(*event);
        Ok(())
    }
}

/// Send queued sounds, particles and damage numbers as `PresentationEvent`s.
pub fn forward_presentation(
    mut run: ResMut<CombatLoop>,
    mut writer: EventWriter<PresentationEvent>,
) {
    let mut sink = EventSink {
        writer: &mut writer,
    };
    run.flush_presentation(&mut sink);
}

/// Send gameplay milestones as `RunEvent`s.
pub fn forward_run_events(mut run: ResMut<CombatLoop>, mut writer: EventWriter<RunEvent>) {
    for event in run.drain_events() {
        writer.send(event);
    }
}
