//! Damage Resolver
//!
//! Turns a hit on an enemy into a health change:
//!
//! 1. base damage x conditional multipliers (target burning, frozen,
//!    paralyzed or blinded, each scaled by the matching vulnerability bonus)
//! 2. critical roll, x crit multiplier on success (attacks and chains only)
//! 3. tank resistance (x0.5, or x1.25 once the anti-tank upgrade is owned)
//! 4. floor, subtract from health
//! 5. life steal heals the player for `floor(dealt x life_steal)`
//!
//! Damage-over-time from status ticks never comes through here; the status
//! table subtracts it directly.

use bevy::math::Vec2;

use super::components::{Enemy, GameRng, Player, PlayerBonuses};
use super::constants::*;
use super::presentation::{DamageColor, PresentationQueue, SoundCue};
use super::status_effects::StatusEffects;

/// Where a hit came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageSource {
    /// Orbs, lightning, seeds, quake, boomerangs and the clone.
    Attack,
    /// Electric chain jump.
    Chain,
    /// Mind fracture pulse from a confused enemy.
    Pulse,
    /// Thorns reflected onto an attacker.
    Reflect,
}

impl DamageSource {
    pub fn can_crit(self) -> bool {
        matches!(self, DamageSource::Attack | DamageSource::Chain)
    }

    pub fn grants_life_steal(self) -> bool {
        matches!(self, DamageSource::Attack | DamageSource::Chain)
    }

    fn color(self) -> DamageColor {
        match self {
            DamageSource::Attack => DamageColor::Normal,
            DamageSource::Chain => DamageColor::Chain,
            DamageSource::Pulse => DamageColor::Pulse,
            DamageSource::Reflect => DamageColor::Reflect,
        }
    }
}

/// A single hit against an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub base: f32,
    pub source: DamageSource,
}

impl Hit {
    pub fn new(base: f32, source: DamageSource) -> Self {
        Self { base, source }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageResult {
    pub dealt: f32,
    pub critical: bool,
    pub healed: f32,
    /// Target health is at or below zero after this hit.
    pub lethal: bool,
}

/// Product of the vulnerability multipliers that apply to `status`.
pub fn conditional_multiplier(bonuses: &PlayerBonuses, status: &StatusEffects) -> f32 {
    let mut multiplier = 1.0;
    if status.burn.active {
        multiplier *= 1.0 + bonuses.burning_vulnerability;
    }
    if status.freeze.active {
        multiplier *= 1.0 + bonuses.frozen_vulnerability;
    }
    if status.paralyze.active {
        multiplier *= 1.0 + bonuses.paralyzed_vulnerability;
    }
    if status.blind.active {
        multiplier *= 1.0 + bonuses.blinded_vulnerability;
    }
    multiplier
}

fn tank_multiplier(player: &Player) -> f32 {
    if player.flags.has_anti_tank {
        ANTI_TANK_DAMAGE_TAKEN
    } else {
        TANK_DAMAGE_TAKEN
    }
}

/// Resolve `hit` against `target`. Inactive targets take nothing.
pub fn apply_damage(
    player: &mut Player,
    target: &mut Enemy,
    hit: Hit,
    rng: &mut GameRng,
    fx: &mut PresentationQueue,
) -> DamageResult {
    if !target.active {
        return DamageResult::default();
    }

    let mut amount = hit.base * conditional_multiplier(&player.bonuses, &target.status);

    let critical = hit.source.can_crit()
        && player.bonuses.crit_chance > 0.0
        && rng.roll(player.bonuses.crit_chance);
    if critical {
        amount *= player.bonuses.crit_multiplier();
    }

    if target.is_tank {
        amount *= tank_multiplier(player);
    }

    let dealt = amount.max(0.0).floor();
    debug_assert!(dealt >= 0.0);
    target.health -= dealt;

    let healed = if hit.source.grants_life_steal() && player.bonuses.life_steal > 0.0 {
        player.heal((dealt * player.bonuses.life_steal).floor())
    } else {
        0.0
    };

    let color = if critical {
        DamageColor::Critical
    } else {
        hit.source.color()
    };
    fx.show_number(dealt, color, target.position);
    fx.play_sound(if critical {
        SoundCue::CriticalHit
    } else {
        SoundCue::Hit
    });
    if healed > 0.0 {
        fx.show_number(healed, DamageColor::Heal, player.position);
    }

    DamageResult {
        dealt,
        critical,
        healed,
        lethal: target.health <= 0.0,
    }
}

/// Thorns: a separate hit against the attacker worth
/// `floor(incoming x thorns)`. Returns `None` without the upgrade.
pub fn reflect_hit(player: &Player, incoming: f32) -> Option<Hit> {
    let reflected = (incoming * player.bonuses.thorns).floor();
    if player.bonuses.thorns > 0.0 && reflected > 0.0 {
        Some(Hit::new(reflected, DamageSource::Reflect))
    } else {
        None
    }
}

/// Damage the player takes from a raw incoming amount after defense.
/// Never less than 1.
pub fn player_damage_taken(raw: f32, defense: f32) -> f32 {
    (raw - defense).max(1.0).floor()
}

/// Point-to-segment distance, used by line attacks.
pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::play_run::components::{EnemyId, EnemyKind};
    use crate::states::play_run::spawner::build_enemy;

    fn setup(kind: EnemyKind) -> (Player, Enemy, GameRng, PresentationQueue) {
        let mut enemy = build_enemy(EnemyId(1), kind, 1, Vec2::ZERO, 0.0);
        enemy.health = 1000.0;
        (
            Player::new(Vec2::ZERO),
            enemy,
            GameRng::from_seed(1),
            PresentationQueue::default(),
        )
    }

    #[test]
    fn test_plain_hit_is_floored() {
        let (mut player, mut enemy, mut rng, mut fx) = setup(EnemyKind::Basic);
        let result = apply_damage(
            &mut player,
            &mut enemy,
            Hit::new(10.7, DamageSource::Attack),
            &mut rng,
            &mut fx,
        );
        assert_eq!(result.dealt, 10.0);
        assert_eq!(enemy.health, 990.0);
        assert!(!result.critical);
    }

    #[test]
    fn test_crit_combines_with_conditional_multiplier() {
        let (mut player, mut enemy, mut rng, mut fx) = setup(EnemyKind::Basic);
        player.bonuses.crit_chance = 1.0;
        player.bonuses.frozen_vulnerability = 0.5;
        enemy.status.apply_freeze(2000.0, 0.0);
        let result = apply_damage(
            &mut player,
            &mut enemy,
            Hit::new(10.0, DamageSource::Attack),
            &mut rng,
            &mut fx,
        );
        assert!(result.critical);
        assert_eq!(result.dealt, 30.0);
    }

    #[test]
    fn test_tank_resistance_and_anti_tank() {
        let (mut player, mut enemy, mut rng, mut fx) = setup(EnemyKind::Tank);
        let halved = apply_damage(
            &mut player,
            &mut enemy,
            Hit::new(20.0, DamageSource::Attack),
            &mut rng,
            &mut fx,
        );
        assert_eq!(halved.dealt, 10.0);
        player.flags.has_anti_tank = true;
        let boosted = apply_damage(
            &mut player,
            &mut enemy,
            Hit::new(20.0, DamageSource::Attack),
            &mut rng,
            &mut fx,
        );
        assert_eq!(boosted.dealt, 25.0);
    }

    #[test]
    fn test_life_steal_floors_and_clamps() {
        let (mut player, mut enemy, mut rng, mut fx) = setup(EnemyKind::Basic);
        player.health = 50.0;
        player.bonuses.life_steal = 0.15;
        let result = apply_damage(
            &mut player,
            &mut enemy,
            Hit::new(25.0, DamageSource::Attack),
            &mut rng,
            &mut fx,
        );
        assert_eq!(result.healed, 3.0);
        assert_eq!(player.health, 53.0);
    }

    #[test]
    fn test_reflect_never_crits() {
        let (mut player, mut enemy, mut rng, mut fx) = setup(EnemyKind::Basic);
        player.bonuses.crit_chance = 1.0;
        player.bonuses.thorns = 0.3;
        let hit = reflect_hit(&player, 25.0).unwrap();
        assert_eq!(hit.base, 7.0);
        let result = apply_damage(&mut player, &mut enemy, hit, &mut rng, &mut fx);
        assert!(!result.critical);
        assert_eq!(result.dealt, 7.0);
    }

    #[test]
    fn test_player_damage_has_floor_of_one() {
        assert_eq!(player_damage_taken(3.0, 10.0), 1.0);
        assert_eq!(player_damage_taken(12.5, 2.0), 10.0);
    }

    #[test]
    fn test_segment_distance() {
        let d = distance_to_segment(Vec2::new(5.0, 3.0), Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert_eq!(d, 3.0);
    }
}
