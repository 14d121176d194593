//! End-to-end tests for the combat loop
//!
//! These tests drive `CombatLoop` directly and verify:
//! - The wave completion path (advance, growth, heal, delayed next wave)
//! - Pause freezes game time and everything scheduled on it
//! - Level-up choices queue and resolve in order
//! - Game over cancels pending events and records the run

use bevy::math::Vec2;
use wave_survival::combat::events::{PlayerHurtSource, RunEvent};
use wave_survival::states::play_run::components::{EnemyKind, GameRng};
use wave_survival::states::play_run::constants::{INITIAL_XP_TO_NEXT, NEXT_WAVE_DELAY_MS};
use wave_survival::states::play_run::systems::FrameInput;
use wave_survival::states::play_run::timers::TimedEventKind;
use wave_survival::states::play_run::waves::WavePhase;
use wave_survival::states::play_run::{CombatLoop, LevelUpChoice, RunStatus, UpgradeCatalog};
use wave_survival::{RunConfig, SessionContext};

fn run_with(config: RunConfig) -> CombatLoop {
    CombatLoop::new(
        config,
        SessionContext::default(),
        UpgradeCatalog::default(),
        GameRng::from_seed(42),
    )
    .expect("valid run")
}

fn idle() -> FrameInput {
    FrameInput::default()
}

// =============================================================================
// Wave Completion Scenario
// =============================================================================

#[test]
fn test_wave_four_completion_scenario() {
    let mut run = run_with(RunConfig {
        starting_wave: 4,
        starting_enemies: 15,
        ..Default::default()
    });
    run.timers_mut().cancel_all();
    {
        let waves = run.waves_mut();
        waves.enemies_spawned = 15;
        waves.enemies_alive = 0;
        waves.phase = WavePhase::AllSpawnedWaitingForClear;
    }
    run.player_mut().health = 60.0;
    let max_health = run.player().max_health;

    let completion = run.check_wave_completion().expect("wave should complete");

    assert_eq!(completion.completed_wave, 4);
    assert_eq!(run.waves().wave_number, 5);
    assert_eq!(run.waves().enemies_this_wave, 19);
    assert_eq!(run.player().health, (60.0 + max_health * 0.25).min(max_health));

    let next = run
        .timers()
        .next_matching(|kind| matches!(kind, TimedEventKind::StartWave))
        .expect("next wave scheduled");
    assert_eq!(next.at, run.clock() + NEXT_WAVE_DELAY_MS);
}

#[test]
fn test_heal_on_completion_is_clamped() {
    let mut run = run_with(RunConfig::default());
    run.timers_mut().cancel_all();
    {
        let waves = run.waves_mut();
        waves.enemies_spawned = waves.enemies_this_wave;
        waves.enemies_alive = 0;
    }
    run.player_mut().health = 95.0;
    let completion = run.check_wave_completion().unwrap();
    assert_eq!(run.player().health, run.player().max_health);
    assert_eq!(completion.healed, 5.0);
}

#[test]
fn test_next_wave_waits_for_unpaused_game_time() {
    let mut run = run_with(RunConfig {
        starting_wave: 4,
        starting_enemies: 15,
        ..Default::default()
    });
    run.timers_mut().cancel_all();
    {
        let waves = run.waves_mut();
        waves.enemies_spawned = 15;
        waves.enemies_alive = 0;
    }
    run.check_wave_completion().unwrap();

    // Paused frames do not count toward the delay
    run.set_paused(true);
    for _ in 0..10 {
        assert!(!run.update(1000.0, idle()));
    }
    assert_eq!(run.clock(), 0.0);
    assert_eq!(run.waves().phase, WavePhase::Completing);

    run.set_paused(false);
    run.update(NEXT_WAVE_DELAY_MS - 1.0, idle());
    assert_eq!(run.waves().phase, WavePhase::Completing);

    run.update(1.0, idle());
    assert_eq!(run.waves().phase, WavePhase::Spawning);
    assert_eq!(run.waves().wave_number, 5);
    assert!(run.waves().is_boss_wave);
    assert!(run.enemies().iter().any(|e| e.is_boss));
}

// =============================================================================
// Level-Up Flow
// =============================================================================

#[test]
fn test_level_up_pauses_until_choice() {
    let mut run = run_with(RunConfig::default());
    run.grant_xp(INITIAL_XP_TO_NEXT);

    assert!(run.is_paused());
    assert!(!run.update(16.0, idle()));
    assert!(matches!(run.pending_choice(), Some(LevelUpChoice::Elements(_))));

    run.select_choice(1).unwrap();
    assert!(run.player().element.is_some());
    assert!(run.update(16.0, idle()));
}

#[test]
fn test_multiple_levels_queue_choices() {
    let mut run = run_with(RunConfig::default());
    let levels = run.grant_xp(500);
    assert!(levels >= 3);

    let mut resolved = 0;
    while run.pending_choice().is_some() {
        run.select_choice(0).unwrap();
        resolved += 1;
    }
    assert_eq!(resolved, levels);
    assert_eq!(run.queued_level_ups(), 0);

    let events = run.drain_events();
    let level_ups = events
        .iter()
        .filter(|e| matches!(e, RunEvent::LevelUp { .. }))
        .count();
    assert_eq!(level_ups as u32, levels);
    assert!(events.iter().any(|e| matches!(e, RunEvent::ElementChosen { .. })));
}

// =============================================================================
// Player Damage
// =============================================================================

#[test]
fn test_invulnerability_window_blocks_repeat_hits() {
    let mut run = run_with(RunConfig::default());
    let first = run.hurt_player(10.0, PlayerHurtSource::BomberBlast, None);
    let second = run.hurt_player(10.0, PlayerHurtSource::BomberBlast, None);
    assert_eq!(first, 10.0);
    assert_eq!(second, 0.0);
}

#[test]
fn test_thorns_reflect_onto_attacker() {
    let mut run = run_with(RunConfig::default());
    run.player_mut().bonuses.thorns = 0.5;
    let position = run.player().position + Vec2::new(300.0, 0.0);
    let index = run.spawn_enemy_at(EnemyKind::Tank, position);
    let before = run.enemies().get(index).unwrap().health;

    run.hurt_player(20.0, PlayerHurtSource::Contact(EnemyKind::Tank), Some(index));

    // Tank armor halves the reflected 10
    assert_eq!(run.enemies().get(index).unwrap().health, before - 5.0);
}

// =============================================================================
// Game Over
// =============================================================================

#[test]
fn test_game_over_cancels_timers_and_records_session() {
    let mut run = run_with(RunConfig::default());
    assert!(!run.timers().is_empty());

    run.player_mut().health = 1.0;
    let position = run.player().position;
    run.spawn_enemy_at(EnemyKind::Basic, position);
    run.update(16.0, idle());

    assert_eq!(run.status(), RunStatus::GameOver);
    assert!(run.timers().is_empty());
    let summary = run.summary().expect("summary recorded").clone();
    assert_eq!(summary.wave_reached, 1);
    assert_eq!(summary.survival_time_ms, 16.0);
    assert_eq!(run.session().runs_played, 1);
    assert!(run
        .drain_events()
        .iter()
        .any(|e| matches!(e, RunEvent::GameOver { .. })));

    // Nothing advances after game over
    assert!(!run.update(16.0, idle()));
    assert_eq!(run.clock(), 16.0);
}

#[test]
fn test_reset_starts_fresh_run() {
    let mut run = run_with(RunConfig::default());
    run.player_mut().health = 0.0;
    run.update(16.0, idle());
    assert_eq!(run.status(), RunStatus::GameOver);

    run.reset();
    assert_eq!(run.status(), RunStatus::Playing);
    assert_eq!(run.clock(), 0.0);
    assert_eq!(run.waves().wave_number, 1);
    assert!(run.enemies().is_empty());
    assert_eq!(run.timers().len(), 5);
    // Session survives the reset
    assert_eq!(run.session().runs_played, 1);
}

#[test]
fn test_bomber_detonates_without_reward() {
    let mut run = run_with(RunConfig::default());
    let position = run.player().position + Vec2::new(20.0, 0.0);
    run.spawn_enemy_at(EnemyKind::Bomber, position);
    let health = run.player().health;

    run.update(16.0, idle());

    assert!(run.player().health < health);
    assert_eq!(run.stats().enemies_killed, 0);
    assert!(run.xp_orbs().is_empty());
    assert_eq!(run.enemies().active_count(), 0);
}

// =============================================================================
// Default Attack
// =============================================================================

#[test]
fn test_enemy_reaching_player_is_held_off_and_killed_by_orbs() {
    let mut run = run_with(RunConfig::default());
    let player = run.player().position;
    let index = run.spawn_enemy_at(EnemyKind::Basic, player + Vec2::new(150.0, 0.0));
    let id = run.enemies().get(index).map(|e| e.id).expect("spawned");

    let mut closest = f32::MAX;
    for _ in 0..500 {
        run.update(16.0, idle());
        if let Some(enemy) = run.enemies().iter().find(|e| e.id == id && e.active) {
            closest = closest.min(enemy.position.distance(player));
        }
    }

    assert!(closest >= 27.9, "enemy overlapped the player: {}", closest);
    assert!(run.enemies().iter().all(|e| e.id != id));
    assert!(run.stats().enemies_killed >= 1);
}
