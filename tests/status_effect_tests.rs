//! Integration tests for status effect ticking and the kill path
//!
//! These tests verify that:
//! - Poison doubles each tick and its stacks reset on expiry
//! - Poison and burn deliver every tick at real frame rates
//! - Slowed enemies get their exact original speed back on expiry
//! - A lethal hit runs the kill path exactly once

use bevy::math::Vec2;
use wave_survival::states::play_run::attacks::Strike;
use wave_survival::states::play_run::components::{EnemyId, EnemyKind, GameRng};
use wave_survival::states::play_run::constants::{BURN_TICK_MS, POISON_DURATION_MS, POISON_TICK_MS};
use wave_survival::states::play_run::elemental_effects::AttackVia;
use wave_survival::states::play_run::spawner::build_enemy;
use wave_survival::states::play_run::status_effects::{self, StatusKind, TickRules};
use wave_survival::states::play_run::systems::FrameInput;
use wave_survival::states::play_run::{CombatLoop, UpgradeCatalog};
use wave_survival::{RunConfig, SessionContext};

fn sturdy_enemy() -> wave_survival::states::play_run::Enemy {
    build_enemy(EnemyId(0), EnemyKind::Tank, 10, Vec2::ZERO, 0.0)
}

/// Game clock after `frames` frames of `step` ms, accumulated the way the
/// combat loop accumulates it.
fn clock_after(frames: u32, step: f64) -> f64 {
    (0..frames).fold(0.0, |clock, _| clock + step)
}

/// Tick `enemy` once per frame starting on the frame `kind` was applied at
/// `start`, until it expires. Returns the damage of every tick of `kind`.
fn tick_until_expired(
    enemy: &mut wave_survival::states::play_run::Enemy,
    kind: StatusKind,
    start: f64,
    step: f64,
) -> Vec<f32> {
    let mut dealt = Vec::new();
    let mut now = start;
    for _ in 0..10_000 {
        let report = status_effects::tick(enemy, now, step, TickRules::default());
        dealt.extend(report.damage.iter().filter(|d| d.kind == kind).map(|d| d.amount));
        if !enemy.status.is_active(kind) {
            return dealt;
        }
        now += step;
    }
    panic!("{:?} never expired", kind);
}

// =============================================================================
// Poison
// =============================================================================

#[test]
fn test_poison_ticks_double_then_reset() {
    let mut enemy = sturdy_enemy();
    let base = 3.0;
    enemy.status.apply_poison(base, 0.0);

    let mut dealt = Vec::new();
    let mut now = 0.0;
    while now < POISON_DURATION_MS {
        now += POISON_TICK_MS;
        let report = status_effects::tick(&mut enemy, now, POISON_TICK_MS, TickRules::default());
        for damage in &report.damage {
            assert_eq!(damage.kind, StatusKind::Poison);
            dealt.push(damage.amount);
        }
    }

    assert_eq!(dealt, vec![base, base * 2.0, base * 4.0]);
    assert!(!enemy.status.poison.active);
    assert_eq!(enemy.status.poison_stacks, 0);
}

#[test]
fn test_poison_reapplied_after_expiry_starts_at_base() {
    let mut enemy = sturdy_enemy();
    enemy.status.apply_poison(2.0, 0.0);
    for step in 1..=3 {
        let now = step as f64 * POISON_TICK_MS;
        status_effects::tick(&mut enemy, now, POISON_TICK_MS, TickRules::default());
    }
    assert!(!enemy.status.poison.active);

    let start = 3.0 * POISON_TICK_MS;
    enemy.status.apply_poison(2.0, start);
    let now = start + POISON_TICK_MS;
    let report = status_effects::tick(&mut enemy, now, POISON_TICK_MS, TickRules::default());
    assert_eq!(report.total_damage(), 2.0);
}

#[test]
fn test_poison_deals_three_ticks_at_frame_rate() {
    for step in [16.0, 1000.0 / 60.0] {
        let mut enemy = sturdy_enemy();
        let start = clock_after(37, step);
        enemy.status.apply_poison(2.0, start);

        let dealt = tick_until_expired(&mut enemy, StatusKind::Poison, start, step);

        assert_eq!(dealt, vec![2.0, 4.0, 8.0], "frame step {}", step);
        assert_eq!(enemy.status.poison_stacks, 0);
    }
}

#[test]
fn test_burn_deals_three_ticks_at_frame_rate() {
    for step in [16.0, 1000.0 / 60.0] {
        let mut enemy = sturdy_enemy();
        let start = clock_after(11, step);
        enemy.status.apply_burn(3.0, 3.0 * BURN_TICK_MS, start);

        let dealt = tick_until_expired(&mut enemy, StatusKind::Burn, start, step);

        assert_eq!(dealt, vec![3.0, 3.0, 3.0], "frame step {}", step);
    }
}

#[test]
fn test_condition_is_not_counted_down_on_the_frame_it_lands() {
    let mut enemy = sturdy_enemy();
    enemy.status.apply_freeze(2000.0, 500.0);
    status_effects::tick(&mut enemy, 500.0, 16.0, TickRules::default());
    assert_eq!(enemy.status.freeze.duration, 2000.0);
    status_effects::tick(&mut enemy, 516.0, 16.0, TickRules::default());
    assert_eq!(enemy.status.freeze.duration, 1984.0);
}

#[test]
fn test_status_tick_reports_death() {
    let mut enemy = sturdy_enemy();
    enemy.health = 1.0;
    enemy.status.apply_poison(5.0, 0.0);
    let report =
        status_effects::tick(&mut enemy, POISON_TICK_MS, POISON_TICK_MS, TickRules::default());
    assert!(report.died);
}

// =============================================================================
// Slow
// =============================================================================

#[test]
fn test_slow_recovery_restores_original_speed() {
    let mut enemy = sturdy_enemy();
    let original = enemy.original_speed;
    enemy.status.apply_slow(0.37, 1000.0, 0.0);

    status_effects::tick(&mut enemy, 16.0, 16.0, TickRules::default());
    assert!(enemy.speed < original);

    status_effects::tick(&mut enemy, 1016.0, 1000.0, TickRules::default());
    assert!(!enemy.status.slow.active);
    assert_eq!(enemy.speed, original);
}

#[test]
fn test_slow_amount_is_capped() {
    let mut enemy = sturdy_enemy();
    enemy.status.apply_slow(5.0, 1000.0, 0.0);
    status_effects::tick(&mut enemy, 16.0, 16.0, TickRules::default());
    assert!(enemy.speed > 0.0);
}

// =============================================================================
// Damage-Death Ordering
// =============================================================================

#[test]
fn test_lethal_hit_and_due_burn_kill_once() {
    let mut run = CombatLoop::new(
        RunConfig::default(),
        SessionContext::default(),
        UpgradeCatalog::default(),
        GameRng::from_seed(21),
    )
    .unwrap();

    let far = run.player().position + Vec2::new(400.0, 0.0);
    let index = run.spawn_enemy_at(EnemyKind::Basic, far);
    {
        let enemy = &mut run.enemies_mut().as_mut_slice()[index];
        enemy.health = 5.0;
        // Burn tick due on the very next frame
        enemy.status.apply_burn(50.0, 3000.0, -1000.0);
    }
    let alive_before = run.waves().enemies_alive;

    run.strike(Strike {
        target: index,
        base: 100.0,
        via: AttackVia::Orb,
    });
    run.update(16.0, FrameInput::default());

    assert_eq!(run.stats().enemies_killed, 1);
    assert_eq!(run.xp_orbs().len(), 1);
    assert_eq!(run.waves().enemies_alive, alive_before - 1);
    assert!(!run.kill_enemy(index, true));
}
