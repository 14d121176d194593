//! Attack Patterns
//!
//! Each attack runs on its own timer against game time and produces
//! `Strike`s. A strike is just "hit enemy `i` for `base` via `via`"; the
//! combat loop resolves every strike through the damage resolver and the
//! elemental resolver, so all patterns share one damage path.

use bevy::math::Vec2;
use smallvec::SmallVec;
use std::f32::consts::TAU;

use super::arena::EnemyArena;
use super::components::{EnemyId, Player};
use super::constants::*;
use super::elemental_effects::AttackVia;
use super::elements::AttackMode;
use super::presentation::{ParticleKind, PresentationQueue, SoundCue};

/// One hit waiting to be resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strike {
    pub target: usize,
    pub base: f32,
    pub via: AttackVia,
}

pub type Strikes = SmallVec<[Strike; 8]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seed {
    pub position: Vec2,
    pub detonate_at: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Boomerang {
    pub position: Vec2,
    pub direction: Vec2,
    pub travelled: f32,
    pub returning: bool,
    /// Enemies already struck on the current leg.
    pub hit: SmallVec<[EnemyId; 8]>,
}

/// Timers and in-flight objects for every attack pattern.
#[derive(Clone, Debug, Default)]
pub struct AttackState {
    pub orb_angle: f32,
    pub last_lightning: f64,
    pub last_seed: f64,
    pub last_quake: f64,
    pub last_boomerang: f64,
    pub last_clone: f64,
    pub seeds: Vec<Seed>,
    pub boomerangs: Vec<Boomerang>,
    pub clone_position: Option<Vec2>,
}

impl AttackState {
    /// Run the player's attack pattern and the clone for one frame.
    pub fn update(
        &mut self,
        player: &Player,
        enemies: &mut EnemyArena,
        now: f64,
        delta_ms: f64,
        fx: &mut PresentationQueue,
    ) -> Strikes {
        let mut strikes = Strikes::new();
        match player.attack_mode {
            AttackMode::Orbs => self.orbs(player, enemies, now, delta_ms, &mut strikes),
            AttackMode::Lightning => self.lightning(player, enemies, now, fx, &mut strikes),
            AttackMode::Seeds => self.seeds(player, enemies, now, fx, &mut strikes),
            AttackMode::Quake => self.quake(player, enemies, now, fx, &mut strikes),
            AttackMode::Boomerang => self.boomerangs(player, enemies, now, delta_ms, &mut strikes),
        }
        if player.flags.has_void_clone {
            self.clone_strike(player, enemies, now, &mut strikes);
        }
        strikes
    }

    /// Positions of the orbiting orbs this frame.
    pub fn orb_positions(&self, player: &Player) -> SmallVec<[Vec2; 8]> {
        let count = player.orb_count.max(1);
        (0..count)
            .map(|k| {
                let angle = self.orb_angle + k as f32 * TAU / count as f32;
                player.position + Vec2::from_angle(angle) * ORB_RADIUS
            })
            .collect()
    }

    fn orbs(
        &mut self,
        player: &Player,
        enemies: &mut EnemyArena,
        now: f64,
        delta_ms: f64,
        strikes: &mut Strikes,
    ) {
        self.orb_angle = (self.orb_angle + ORB_ANGULAR_SPEED * (delta_ms / 1000.0) as f32) % TAU;
        let reach = ORB_HIT_RADIUS + CONTACT_RADIUS / 2.0;
        for orb in self.orb_positions(player) {
            for index in enemies.active_within(player.position, ORB_RADIUS + reach) {
                let Some(enemy) = enemies.get_mut(index) else {
                    continue;
                };
                if !orb_touches(enemy.position, player.position, orb, reach) {
                    continue;
                }
                if now - enemy.last_orb_hit < ORB_HIT_COOLDOWN_MS {
                    continue;
                }
                enemy.last_orb_hit = now;
                strikes.push(Strike {
                    target: index,
                    base: player.damage,
                    via: AttackVia::Orb,
                });
            }
        }
    }

    fn lightning(
        &mut self,
        player: &Player,
        enemies: &EnemyArena,
        now: f64,
        fx: &mut PresentationQueue,
        strikes: &mut Strikes,
    ) {
        if now - self.last_lightning < LIGHTNING_INTERVAL_MS {
            return;
        }
        let Some(target) = enemies.nearest_active(player.position, LIGHTNING_RANGE, None) else {
            return;
        };
        self.last_lightning = now;
        if let Some(enemy) = enemies.get(target) {
            fx.spawn_particle(ParticleKind::Lightning, enemy.position);
        }
        fx.play_sound(SoundCue::Lightning);
        strikes.push(Strike {
            target,
            base: player.damage,
            via: AttackVia::Lightning,
        });
    }

    fn seeds(
        &mut self,
        player: &Player,
        enemies: &EnemyArena,
        now: f64,
        fx: &mut PresentationQueue,
        strikes: &mut Strikes,
    ) {
        if now - self.last_seed >= SEED_INTERVAL_MS {
            self.last_seed = now;
            self.seeds.push(Seed {
                position: player.position,
                detonate_at: now + SEED_FUSE_MS,
            });
            fx.spawn_particle(ParticleKind::SeedPlanted, player.position);
        }

        let mut detonated: SmallVec<[Vec2; 4]> = SmallVec::new();
        self.seeds.retain(|seed| {
            if seed.detonate_at <= now {
                detonated.push(seed.position);
                false
            } else {
                true
            }
        });
        for position in detonated {
            fx.spawn_particle(ParticleKind::Explosion, position);
            fx.play_sound(SoundCue::Explosion);
            for target in enemies.active_within(position, SEED_BLAST_RADIUS) {
                strikes.push(Strike {
                    target,
                    base: player.damage,
                    via: AttackVia::Seed,
                });
            }
        }
    }

    fn quake(
        &mut self,
        player: &Player,
        enemies: &EnemyArena,
        now: f64,
        fx: &mut PresentationQueue,
        strikes: &mut Strikes,
    ) {
        if now - self.last_quake < QUAKE_INTERVAL_MS {
            return;
        }
        self.last_quake = now;
        fx.spawn_particle(ParticleKind::Quake, player.position);
        fx.play_sound(SoundCue::Quake);
        for target in enemies.active_within(player.position, QUAKE_RADIUS) {
            strikes.push(Strike {
                target,
                base: player.damage,
                via: AttackVia::Quake,
            });
        }
    }

    fn boomerangs(
        &mut self,
        player: &Player,
        enemies: &EnemyArena,
        now: f64,
        delta_ms: f64,
        strikes: &mut Strikes,
    ) {
        if now - self.last_boomerang >= BOOMERANG_INTERVAL_MS && self.boomerangs.is_empty() {
            self.last_boomerang = now;
            let aim = enemies
                .nearest_active(player.position, f32::INFINITY, None)
                .and_then(|i| enemies.get(i))
                .and_then(|e| (e.position - player.position).try_normalize())
                .unwrap_or(Vec2::X);
            let count = player.boomerang_count.max(1);
            for k in 0..count {
                let spread = k as f32 * TAU / count as f32;
                self.boomerangs.push(Boomerang {
                    position: player.position,
                    direction: Vec2::from_angle(spread).rotate(aim),
                    travelled: 0.0,
                    returning: false,
                    hit: SmallVec::new(),
                });
            }
        }

        let step = BOOMERANG_SPEED * (delta_ms / 1000.0) as f32;
        for boomerang in &mut self.boomerangs {
            if boomerang.returning {
                let back = player.position - boomerang.position;
                boomerang.direction = back.try_normalize().unwrap_or(Vec2::ZERO);
            }
            boomerang.position += boomerang.direction * step;
            boomerang.travelled += step;
            if !boomerang.returning && boomerang.travelled >= BOOMERANG_RANGE {
                boomerang.returning = true;
                boomerang.hit.clear();
            }

            for target in enemies.active_within(boomerang.position, BOOMERANG_HIT_RADIUS) {
                let Some(enemy) = enemies.get(target) else {
                    continue;
                };
                if boomerang.hit.contains(&enemy.id) {
                    continue;
                }
                boomerang.hit.push(enemy.id);
                strikes.push(Strike {
                    target,
                    base: player.damage,
                    via: AttackVia::Boomerang,
                });
            }
        }
        self.boomerangs.retain(|b| {
            !(b.returning && b.position.distance(player.position) <= BOOMERANG_HIT_RADIUS)
        });
    }

    fn clone_strike(
        &mut self,
        player: &Player,
        enemies: &EnemyArena,
        now: f64,
        strikes: &mut Strikes,
    ) {
        let position = player.position + Vec2::new(CLONE_OFFSET, 0.0);
        self.clone_position = Some(position);
        if now - self.last_clone < CLONE_INTERVAL_MS {
            return;
        }
        if let Some(target) = enemies.nearest_active(position, CLONE_RANGE, None) {
            self.last_clone = now;
            strikes.push(Strike {
                target,
                base: player.damage * CLONE_DAMAGE_FACTOR,
                via: AttackVia::Clone,
            });
        }
    }
}

/// An orb hits what it touches on its ring, and anything inside the ring
/// that its arm is sweeping across.
fn orb_touches(target: Vec2, center: Vec2, orb: Vec2, reach: f32) -> bool {
    if target.distance(orb) <= reach {
        return true;
    }
    let offset = target - center;
    if offset.length() > ORB_RADIUS {
        return false;
    }
    let arm = (orb - center).normalize_or_zero();
    offset.normalize_or_zero().dot(arm) >= ORB_SWEEP_HALF_ARC.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::play_run::components::EnemyKind;
    use crate::states::play_run::spawner::build_enemy;

    fn arena_with(positions: &[Vec2]) -> EnemyArena {
        let mut arena = EnemyArena::default();
        for (i, pos) in positions.iter().enumerate() {
            arena.push(build_enemy(EnemyId(i as u32), EnemyKind::Basic, 1, *pos, 0.0));
        }
        arena
    }

    #[test]
    fn test_orb_hit_respects_cooldown() {
        let player = Player::new(Vec2::ZERO);
        let mut state = AttackState::default();
        let mut fx = PresentationQueue::default();
        // Orb 0 sits at angle 0 before the first advance.
        let mut arena = arena_with(&[Vec2::new(ORB_RADIUS, 0.0)]);
        let first = state.update(&player, &mut arena, 100.0, 0.0, &mut fx);
        assert_eq!(first.len(), 1);
        let second = state.update(&player, &mut arena, 200.0, 0.0, &mut fx);
        assert!(second.is_empty());
        let third = state.update(&player, &mut arena, 100.0 + ORB_HIT_COOLDOWN_MS, 0.0, &mut fx);
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn test_orb_arm_hits_enemy_at_player_body() {
        let player = Player::new(Vec2::new(500.0, 500.0));
        let mut state = AttackState::default();
        let mut fx = PresentationQueue::default();
        let under_arm = player.position + Vec2::new(ENEMY_STANDOFF_DISTANCE, 0.0);
        let between_arms = player.position + Vec2::from_angle(TAU / 6.0) * ENEMY_STANDOFF_DISTANCE;
        let mut arena = arena_with(&[under_arm, between_arms]);

        let strikes = state.update(&player, &mut arena, 100.0, 0.0, &mut fx);

        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].target, 0);
    }

    #[test]
    fn test_lightning_waits_for_interval() {
        let mut player = Player::new(Vec2::ZERO);
        player.attack_mode = AttackMode::Lightning;
        let mut state = AttackState::default();
        let mut fx = PresentationQueue::default();
        let mut arena = arena_with(&[Vec2::new(100.0, 0.0)]);
        assert!(state.update(&player, &mut arena, 1000.0, 16.0, &mut fx).is_empty());
        let strikes = state.update(&player, &mut arena, LIGHTNING_INTERVAL_MS, 16.0, &mut fx);
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].via, AttackVia::Lightning);
    }

    #[test]
    fn test_seed_detonates_after_fuse() {
        let mut player = Player::new(Vec2::ZERO);
        player.attack_mode = AttackMode::Seeds;
        let mut state = AttackState::default();
        let mut fx = PresentationQueue::default();
        let mut arena = arena_with(&[Vec2::new(30.0, 0.0)]);
        assert!(state.update(&player, &mut arena, SEED_INTERVAL_MS, 16.0, &mut fx).is_empty());
        assert_eq!(state.seeds.len(), 1);
        let detonation = SEED_INTERVAL_MS + SEED_FUSE_MS;
        let strikes = state.update(&player, &mut arena, detonation, 16.0, &mut fx);
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].via, AttackVia::Seed);
    }

    #[test]
    fn test_clone_strikes_at_half_damage() {
        let mut player = Player::new(Vec2::ZERO);
        player.attack_mode = AttackMode::Quake;
        player.flags.has_void_clone = true;
        let mut state = AttackState::default();
        state.last_quake = f64::INFINITY;
        let mut fx = PresentationQueue::default();
        let mut arena = arena_with(&[Vec2::new(CLONE_OFFSET + 50.0, 0.0)]);
        let strikes = state.update(&player, &mut arena, CLONE_INTERVAL_MS, 16.0, &mut fx);
        assert_eq!(strikes.len(), 1);
        assert_eq!(strikes[0].base, player.damage * CLONE_DAMAGE_FACTOR);
    }
}
