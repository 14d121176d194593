//! Headless run execution
//!
//! Runs a full wave-survival run without any graphical output, with an
//! auto-picker standing in for the player at every level-up.

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::combat::systems::record_combat_log;
use crate::combat::CombatPlugin;
use crate::states::play_run::elements::Element;
use crate::states::play_run::upgrade_config::{
    load_upgrade_catalog, UpgradeCatalog, UpgradeConfigPlugin,
};
use crate::states::play_run::upgrades::LevelUpChoice;
// Use the stable systems API instead of importing internal functions directly
use crate::states::play_run::systems::{
    self, CombatLoop, FixedFrameStep, FrameInput, GameRng, RunInput, RunStatus, RunSummary,
    DEFAULT_FRAME_STEP_MS,
};
use crate::states::run_config::RunConfig;
use crate::states::session::SessionContext;

use super::config::HeadlessRunConfig;

/// Result of a completed headless run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub summary: RunSummary,
    /// False when the run hit `max_duration_secs` with the player still alive
    pub player_died: bool,
    /// Random seed used (if deterministic mode)
    pub random_seed: Option<u64>,
    /// Damage dealt per hit source
    pub damage_by_source: HashMap<String, f32>,
}

/// Resource to track headless run state
#[derive(Resource)]
pub struct HeadlessRunState {
    /// Game time in seconds after which the run is stopped
    pub max_duration: f32,
    pub output_path: Option<String>,
    pub run_complete: bool,
    pub random_seed: Option<u64>,
    /// Elements the auto-picker takes when offered, in priority order
    pub preferred_elements: Vec<Element>,
    pub result: Option<RunResult>,
}

/// Index the auto-picker takes for `choice`: the first preferred element on
/// offer, otherwise the first option.
pub fn auto_pick_index(choice: &LevelUpChoice, preferred: &[Element]) -> usize {
    match choice {
        LevelUpChoice::Elements(options) => preferred
            .iter()
            .find_map(|wanted| options.iter().position(|e| e == wanted))
            .unwrap_or(0),
        LevelUpChoice::Upgrades(_) => 0,
    }
}

fn seeded_rng(seed: Option<u64>) -> GameRng {
    match seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    }
}

/// Plugin for headless run execution
pub struct HeadlessPlugin {
    pub config: HeadlessRunConfig,
}

impl Plugin for HeadlessPlugin {
    fn build(&self, app: &mut App) {
        let run_config = self
            .config
            .to_run_config()
            .expect("Invalid run configuration");
        let preferred_elements = self
            .config
            .preferred_elements()
            .expect("Invalid preferred elements");

        app.insert_resource(run_config)
            .insert_resource(HeadlessRunState {
                max_duration: self.config.max_duration_secs,
                output_path: self.config.output_path.clone(),
                run_complete: false,
                random_seed: self.config.random_seed,
                preferred_elements,
                result: None,
            })
            .insert_resource(FixedFrameStep(DEFAULT_FRAME_STEP_MS))
            .init_resource::<RunInput>()
            .add_plugins(CombatPlugin);

        systems::configure_run_system_ordering(app);
        systems::add_core_run_systems(app, resource_exists::<CombatLoop>);

        app.add_systems(Startup, headless_setup_run)
            .add_systems(
                Update,
                (headless_auto_pick, headless_check_run_end)
                    .chain()
                    .after(record_combat_log)
                    .run_if(resource_exists::<CombatLoop>),
            )
            .add_systems(PostUpdate, headless_exit_on_complete);
    }
}

/// Setup system for headless run
fn headless_setup_run(
    mut commands: Commands,
    config: Res<RunConfig>,
    catalog: Res<UpgradeCatalog>,
    mut headless_state: ResMut<HeadlessRunState>,
    mut combat_log: ResMut<CombatLog>,
) {
    combat_log.clear();
    combat_log.log(
        CombatLogEventType::RunMilestone,
        "Run started (headless mode)!".to_string(),
    );

    let rng = seeded_rng(headless_state.random_seed);
    match CombatLoop::new(config.clone(), SessionContext::default(), catalog.clone(), rng) {
        Ok(run) => {
            info!(
                "Headless run setup complete: wave {}, {} enemies",
                config.starting_wave, config.starting_enemies
            );
            commands.insert_resource(run);
        }
        Err(e) => {
            error!("Failed to start run: {}", e);
            headless_state.run_complete = true;
        }
    }
}

/// Resolve any pending level-up choice on the player's behalf.
fn headless_auto_pick(mut run: ResMut<CombatLoop>, headless_state: Res<HeadlessRunState>) {
    let Some(index) = run
        .pending_choice()
        .map(|choice| auto_pick_index(choice, &headless_state.preferred_elements))
    else {
        return;
    };
    if let Err(e) = run.select_choice(index) {
        warn!("Auto-pick failed: {}", e);
    }
}

/// Check if the run has ended (player died, or timeout)
fn headless_check_run_end(
    run: Res<CombatLoop>,
    combat_log: Res<CombatLog>,
    mut headless_state: ResMut<HeadlessRunState>,
) {
    if headless_state.run_complete {
        return;
    }

    let player_died = run.status() == RunStatus::GameOver;
    let elapsed_secs = run.clock() / 1000.0;
    if !player_died && elapsed_secs < headless_state.max_duration as f64 {
        return;
    }

    let summary = run.summary().cloned().unwrap_or_else(|| run.run_summary());
    if player_died {
        info!("Run ended! Player fell on wave {}", summary.wave_reached);
    } else {
        info!(
            "Run timed out after {:.1}s on wave {}",
            elapsed_secs, summary.wave_reached
        );
    }

    match combat_log.save_to_file(&summary, headless_state.output_path.as_deref()) {
        Ok(filename) => {
            println!("Run complete. Log saved to: {}", filename);
        }
        Err(e) => {
            warn!("Failed to save combat log: {}", e);
        }
    }

    headless_state.result = Some(RunResult {
        summary,
        player_died,
        random_seed: headless_state.random_seed,
        damage_by_source: combat_log.damage_by_source(),
    });
    headless_state.run_complete = true;
}

/// Exit the app when the run is complete
fn headless_exit_on_complete(
    headless_state: Res<HeadlessRunState>,
    mut exit: EventWriter<AppExit>,
) {
    if headless_state.run_complete {
        exit.send(AppExit::Success);
    }
}

/// Drive a run to completion in-process, without a Bevy app. Uses the same
/// fixed frame step and auto-picker as the headless plugin.
pub fn simulate_run(config: &HeadlessRunConfig) -> Result<RunResult, String> {
    config.validate()?;
    let run_config = config.to_run_config()?;
    let preferred = config.preferred_elements()?;
    let catalog = load_upgrade_catalog()?;

    let mut run = CombatLoop::new(
        run_config,
        SessionContext::default(),
        catalog,
        seeded_rng(config.random_seed),
    )?;
    let mut log = CombatLog::default();
    let limit_ms = config.max_duration_secs as f64 * 1000.0;

    while run.status() == RunStatus::Playing && run.clock() < limit_ms {
        if let Some(index) = run
            .pending_choice()
            .map(|choice| auto_pick_index(choice, &preferred))
        {
            run.select_choice(index)?;
        }
        run.update(DEFAULT_FRAME_STEP_MS, FrameInput::default());
        run.presentation_mut().clear();
        log.run_time = run.clock() / 1000.0;
        for event in run.drain_events() {
            log.log_run_event(&event);
        }
    }

    Ok(RunResult {
        summary: run.summary().cloned().unwrap_or_else(|| run.run_summary()),
        player_died: run.status() == RunStatus::GameOver,
        random_seed: config.random_seed,
        damage_by_source: log.damage_by_source(),
    })
}

/// Run a headless run with the given configuration
pub fn run_headless_run(config: HeadlessRunConfig) -> Result<(), String> {
    config.validate()?;
    println!("Starting headless run simulation...");
    if !config.preferred_elements.is_empty() {
        println!("  Preferred elements: {:?}", config.preferred_elements);
    }
    println!("  Starting wave: {}", config.starting_wave);
    println!("  Max duration: {:.0}s", config.max_duration_secs);

    App::new()
        // Minimal plugins - no window, no rendering; frames run back to back
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::ZERO)))
        .add_plugins(LogPlugin::default())
        // Load upgrade definitions from config
        .add_plugins(UpgradeConfigPlugin)
        .add_plugins(HeadlessPlugin { config })
        .run();

    Ok(())
}
