//! Enemy Spawner
//!
//! Picks the enemy type for each timed spawn and builds enemies with their
//! wave-scaled stats. Health and damage grow linearly with the wave number;
//! speed is a fixed per-type constant and never scales.

use bevy::math::Vec2;

use super::arena::ArenaBounds;
use super::components::{Enemy, EnemyId, EnemyKind, GameRng};
use super::constants::*;
use super::status_effects::StatusEffects;

/// Base stats for a regular enemy type: `value = base + per_wave * wave`.
#[derive(Clone, Copy, Debug)]
pub struct EnemyStats {
    pub base_health: f32,
    pub health_per_wave: f32,
    pub base_damage: f32,
    pub damage_per_wave: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub score_value: u32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                base_health: 30.0,
                health_per_wave: 5.0,
                base_damage: 10.0,
                damage_per_wave: 1.0,
                speed: 60.0,
                xp_value: 10,
                score_value: 10,
            },
            EnemyKind::Stronger => EnemyStats {
                base_health: 50.0,
                health_per_wave: 8.0,
                base_damage: 15.0,
                damage_per_wave: 2.0,
                speed: 90.0,
                xp_value: 20,
                score_value: 25,
            },
            EnemyKind::Tank => EnemyStats {
                base_health: 150.0,
                health_per_wave: 20.0,
                base_damage: 20.0,
                damage_per_wave: 2.0,
                speed: 40.0,
                xp_value: 40,
                score_value: 50,
            },
            EnemyKind::Bomber => EnemyStats {
                base_health: 40.0,
                health_per_wave: 6.0,
                base_damage: 35.0,
                damage_per_wave: 3.0,
                speed: 80.0,
                xp_value: 25,
                score_value: 30,
            },
            // Per boss tier; see `build_boss`.
            EnemyKind::Boss => EnemyStats {
                base_health: 800.0,
                health_per_wave: 0.0,
                base_damage: 25.0,
                damage_per_wave: 0.0,
                speed: 50.0,
                xp_value: 200,
                score_value: 500,
            },
        }
    }
}

/// Wave-dependent type policy for regular (non-boss) spawns.
///
/// `enemies_spawned` is the number of timed spawns already made this wave,
/// so `0` identifies the first spawn.
pub fn choose_enemy_kind(wave: u32, enemies_spawned: u32, rng: &mut GameRng) -> EnemyKind {
    let first = enemies_spawned == 0;
    match wave {
        0 | 1 | 3 => EnemyKind::Basic,
        2 => {
            if first {
                EnemyKind::Stronger
            } else {
                EnemyKind::Basic
            }
        }
        4 if first => EnemyKind::Tank,
        4..=6 => {
            if rng.random_f32() < 0.7 {
                EnemyKind::Basic
            } else {
                EnemyKind::Stronger
            }
        }
        _ => {
            let roll = rng.random_f32();
            if roll < 0.40 {
                EnemyKind::Basic
            } else if roll < 0.65 {
                EnemyKind::Stronger
            } else if roll < 0.85 {
                EnemyKind::Tank
            } else {
                EnemyKind::Bomber
            }
        }
    }
}

/// Build a regular enemy for `wave`.
pub fn build_enemy(id: EnemyId, kind: EnemyKind, wave: u32, position: Vec2, now: f64) -> Enemy {
    if kind == EnemyKind::Boss {
        return build_boss(id, wave, position, now);
    }
    let stats = kind.stats();
    let w = wave as f32;
    let health = stats.base_health + stats.health_per_wave * w;
    new_enemy(
        id,
        kind,
        position,
        health,
        stats.base_damage + stats.damage_per_wave * w,
        stats.speed,
        stats.xp_value,
        stats.score_value,
        now,
    )
}

/// Build the boss for `wave`, scaled by its tier `floor(wave / 5)` (at least 1).
pub fn build_boss(id: EnemyId, wave: u32, position: Vec2, now: f64) -> Enemy {
    let stats = EnemyKind::Boss.stats();
    let tier = (wave / BOSS_WAVE_INTERVAL).max(1);
    let s = tier as f32;
    let mut boss = new_enemy(
        id,
        EnemyKind::Boss,
        position,
        stats.base_health * s,
        stats.base_damage * s,
        stats.speed + 5.0 * s,
        stats.xp_value * tier,
        stats.score_value * tier,
        now,
    );
    boss.special_ready_at = now + BOSS_GRACE_MS;
    boss
}

#[allow(clippy::too_many_arguments)]
fn new_enemy(
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    health: f32,
    damage: f32,
    speed: f32,
    xp_value: u32,
    score_value: u32,
    now: f64,
) -> Enemy {
    Enemy {
        id,
        kind,
        active: true,
        position,
        velocity: Vec2::ZERO,
        health,
        max_health: health,
        speed,
        original_speed: speed,
        damage,
        xp_value,
        score_value,
        status: StatusEffects::default(),
        is_tank: kind == EnemyKind::Tank,
        is_boss: kind == EnemyKind::Boss,
        is_bomber: kind == EnemyKind::Bomber,
        heading: None,
        confused_heading: 0.0,
        confused_heading_until: 0.0,
        knockback_until: 0.0,
        last_orb_hit: f64::NEG_INFINITY,
        spawned_at: now,
        special_ready_at: 0.0,
    }
}

/// Random point at the spawn distance around the player, clamped to the arena.
pub fn spawn_position(player: Vec2, bounds: &ArenaBounds, rng: &mut GameRng) -> Vec2 {
    let angle = rng.random_angle();
    bounds.clamp(player + Vec2::from_angle(angle) * SPAWN_DISTANCE)
}

/// Hands out enemy ids and builds spawns.
#[derive(Clone, Debug, Default)]
pub struct EnemySpawner {
    next_id: u32,
}

impl EnemySpawner {
    fn next_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn spawn_enemy(
        &mut self,
        wave: u32,
        enemies_spawned: u32,
        player: Vec2,
        bounds: &ArenaBounds,
        now: f64,
        rng: &mut GameRng,
    ) -> Enemy {
        let kind = choose_enemy_kind(wave, enemies_spawned, rng);
        let position = spawn_position(player, bounds, rng);
        build_enemy(self.next_id(), kind, wave, position, now)
    }

    /// Build a specific kind at a fixed position.
    pub fn spawn_kind(&mut self, kind: EnemyKind, wave: u32, position: Vec2, now: f64) -> Enemy {
        build_enemy(self.next_id(), kind, wave, position, now)
    }

    pub fn spawn_boss(
        &mut self,
        wave: u32,
        player: Vec2,
        bounds: &ArenaBounds,
        now: f64,
        rng: &mut GameRng,
    ) -> Enemy {
        let position = spawn_position(player, bounds, rng);
        build_boss(self.next_id(), wave, position, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_one_and_three_are_basic() {
        let mut rng = GameRng::from_seed(9);
        for spawned in 0..10 {
            assert_eq!(choose_enemy_kind(1, spawned, &mut rng), EnemyKind::Basic);
            assert_eq!(choose_enemy_kind(3, spawned, &mut rng), EnemyKind::Basic);
        }
    }

    #[test]
    fn test_wave_four_opens_with_tank() {
        let mut rng = GameRng::from_seed(9);
        assert_eq!(choose_enemy_kind(4, 0, &mut rng), EnemyKind::Tank);
        for spawned in 1..50 {
            let kind = choose_enemy_kind(4, spawned, &mut rng);
            assert!(matches!(kind, EnemyKind::Basic | EnemyKind::Stronger));
        }
    }

    #[test]
    fn test_speed_does_not_scale_with_wave() {
        let early = build_enemy(EnemyId(0), EnemyKind::Stronger, 1, Vec2::ZERO, 0.0);
        let late = build_enemy(EnemyId(1), EnemyKind::Stronger, 20, Vec2::ZERO, 0.0);
        assert_eq!(early.speed, late.speed);
        assert!(late.max_health > early.max_health);
        assert_eq!(late.damage, 15.0 + 2.0 * 20.0);
    }

    #[test]
    fn test_boss_scaling_and_grace() {
        let boss = build_boss(EnemyId(0), 10, Vec2::ZERO, 1000.0);
        assert_eq!(boss.max_health, 1600.0);
        assert_eq!(boss.damage, 50.0);
        assert_eq!(boss.speed, 60.0);
        assert_eq!(boss.xp_value, 400);
        assert_eq!(boss.special_ready_at, 1000.0 + BOSS_GRACE_MS);
        assert!(boss.is_boss);
    }

    #[test]
    fn test_spawn_position_is_inside_arena() {
        let bounds = ArenaBounds::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT);
        let mut rng = GameRng::from_seed(5);
        for _ in 0..100 {
            let p = spawn_position(Vec2::new(10.0, 10.0), &bounds, &mut rng);
            assert!(p.x >= 0.0 && p.x <= bounds.width);
            assert!(p.y >= 0.0 && p.y <= bounds.height);
        }
    }
}
