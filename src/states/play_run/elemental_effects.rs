//! Elemental Effect Resolver
//!
//! Decides which status effects a hit applies based on the player's element,
//! the accumulated upgrade bonuses, and the attack that delivered it.
//!
//! | Element   | Effect                                                        |
//! |-----------|---------------------------------------------------------------|
//! | Flame     | burn (3 + bonus per tick) for 3000 + bonus ms                 |
//! | Water     | 50% + bonus freeze for 2000ms x duration multiplier           |
//! | Electric  | 50% + bonus paralyze for 1000ms; chain jump with the upgrade  |
//! | Nature    | poison always from orbs; chance-based from seed explosions    |
//! | Wind      | knockback 200 x multiplier; orbs also roll 50% + bonus sleep  |
//! | Terra     | knockback 300 x multiplier; upgrade stun and area knockback   |
//! | Gravity   | slow 40% + bonus, 50% confusion; upgrade area slow            |
//! | Celestial | 50% + bonus charm for 3000 + bonus ms                         |
//! | Radiant   | 50% + bonus blind                                             |
//! | Shadow    | 50% + bonus fear for 2000 + bonus ms                          |

use smallvec::SmallVec;

use super::arena::{nearest_in, within_in};
use super::components::{Enemy, GameRng, Player};
use super::constants::*;
use super::elements::Element;
use super::enemy_ai::knock_back;
use super::status_effects::StatusKind;

/// Attack that delivered a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackVia {
    Orb,
    Lightning,
    Seed,
    Quake,
    Boomerang,
    Clone,
    /// Secondary hit from an electric chain; never chains again.
    Chain,
}

/// Follow-up the caller must resolve through the damage resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainHit {
    pub target: usize,
    pub damage: f32,
}

#[derive(Clone, Debug, Default)]
pub struct EffectOutcome {
    /// Conditions newly applied or refreshed on the primary target.
    pub applied: SmallVec<[StatusKind; 4]>,
    /// Other enemies affected by area upgrades.
    pub area_targets: SmallVec<[usize; 8]>,
    pub chain: Option<ChainHit>,
    pub knocked_back: bool,
}

/// Apply the on-hit effects of `element` to `enemies[target]`.
pub fn apply_elemental_effect(
    element: Element,
    player: &Player,
    target: usize,
    enemies: &mut [Enemy],
    via: AttackVia,
    now: f64,
    rng: &mut GameRng,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();
    if !enemies.get(target).is_some_and(|e| e.active) {
        return outcome;
    }

    let bonuses = &player.bonuses;
    let flags = &player.flags;

    match element {
        Element::Flame => {
            let damage = BURN_BASE_DAMAGE + bonuses.burn_damage;
            let duration = BURN_BASE_DURATION_MS + bonuses.burn_duration_ms as f64;
            enemies[target].status.apply_burn(damage, duration, now);
            outcome.applied.push(StatusKind::Burn);
        }
        Element::Water => {
            if rng.roll(FREEZE_BASE_CHANCE + bonuses.freeze_chance) {
                let duration =
                    FREEZE_BASE_DURATION_MS * bonuses.freeze_duration_multiplier() as f64;
                enemies[target].status.apply_freeze(duration, now);
                outcome.applied.push(StatusKind::Freeze);
            }
        }
        Element::Electric => {
            if rng.roll(PARALYZE_BASE_CHANCE + bonuses.paralyze_chance) {
                enemies[target]
                    .status
                    .apply_paralyze(PARALYZE_DURATION_MS, bonuses.paralyze_damage, now);
                outcome.applied.push(StatusKind::Paralyze);
            }
            if flags.has_chain_lightning && via != AttackVia::Chain {
                let origin = enemies[target].position;
                if let Some(next) = nearest_in(enemies, origin, CHAIN_RADIUS, Some(target)) {
                    outcome.chain = Some(ChainHit {
                        target: next,
                        damage: player.damage * CHAIN_DAMAGE_FACTOR,
                    });
                }
            }
        }
        Element::Nature => {
            let applies = match via {
                AttackVia::Seed => rng.roll(SEED_POISON_BASE_CHANCE + bonuses.seed_poison_chance),
                _ => true,
            };
            if applies {
                enemies[target]
                    .status
                    .apply_poison(POISON_BASE_DAMAGE + bonuses.poison_damage, now);
                outcome.applied.push(StatusKind::Poison);
            }
        }
        Element::Wind => {
            let power = WIND_KNOCKBACK_POWER * bonuses.knockback_multiplier();
            knock_back(&mut enemies[target], player.position, power, now);
            outcome.knocked_back = true;
            // Boomerang hits only push.
            if via == AttackVia::Orb && rng.roll(SLEEP_BASE_CHANCE + bonuses.sleep_chance) {
                enemies[target].status.apply_sleep(SLEEP_DURATION_MS, now);
                outcome.applied.push(StatusKind::Sleep);
            }
        }
        Element::Terra => {
            let power = TERRA_KNOCKBACK_POWER * bonuses.knockback_multiplier();
            let origin = enemies[target].position;
            knock_back(&mut enemies[target], player.position, power, now);
            outcome.knocked_back = true;
            if flags.has_terra_stun {
                enemies[target].status.apply_paralyze(TERRA_STUN_MS, 0.0, now);
                outcome.applied.push(StatusKind::Paralyze);
            }
            if flags.has_area_knockback {
                for other in within_in(enemies, origin, TERRA_AREA_KNOCKBACK_RADIUS) {
                    if other != target {
                        knock_back(&mut enemies[other], player.position, power, now);
                        outcome.area_targets.push(other);
                    }
                }
            }
        }
        Element::Gravity => {
            let amount = SLOW_BASE_AMOUNT + bonuses.slow_amount;
            enemies[target].status.apply_slow(amount, SLOW_DURATION_MS, now);
            outcome.applied.push(StatusKind::Slow);
            if rng.roll(CONFUSION_BASE_CHANCE) {
                let duration = CONFUSION_BASE_DURATION_MS + bonuses.confusion_duration_ms as f64;
                enemies[target].status.apply_confusion(duration, now);
                outcome.applied.push(StatusKind::Confusion);
            }
            if flags.has_event_horizon {
                let origin = enemies[target].position;
                for other in within_in(enemies, origin, GRAVITY_AOE_SLOW_RADIUS) {
                    if other != target {
                        enemies[other].status.apply_slow(amount, SLOW_DURATION_MS, now);
                        outcome.area_targets.push(other);
                    }
                }
            }
        }
        Element::Celestial => {
            if rng.roll(CHARM_BASE_CHANCE + bonuses.charm_chance) {
                let duration = CHARM_BASE_DURATION_MS + bonuses.charm_duration_ms as f64;
                enemies[target].status.apply_charm(duration, now);
                outcome.applied.push(StatusKind::Charm);
            }
        }
        Element::Radiant => {
            if rng.roll(BLIND_BASE_CHANCE + bonuses.blind_chance) {
                enemies[target].status.apply_blind(BLIND_DURATION_MS, now);
                outcome.applied.push(StatusKind::Blind);
            }
        }
        Element::Shadow => {
            if rng.roll(FEAR_BASE_CHANCE + bonuses.fear_chance) {
                let duration = FEAR_BASE_DURATION_MS + bonuses.fear_duration_ms as f64;
                enemies[target].status.apply_fear(duration, now);
                outcome.applied.push(StatusKind::Fear);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::play_run::components::{EnemyId, EnemyKind};
    use crate::states::play_run::spawner::build_enemy;
    use bevy::math::Vec2;

    fn enemies(positions: &[Vec2]) -> Vec<Enemy> {
        positions
            .iter()
            .enumerate()
            .map(|(i, p)| build_enemy(EnemyId(i as u32), EnemyKind::Basic, 1, *p, 0.0))
            .collect()
    }

    #[test]
    fn test_flame_always_burns_with_bonuses() {
        let mut player = Player::new(Vec2::ZERO);
        player.bonuses.burn_damage = 2.0;
        player.bonuses.burn_duration_ms = 1000.0;
        let mut list = enemies(&[Vec2::new(50.0, 0.0)]);
        let mut rng = GameRng::from_seed(1);
        apply_elemental_effect(
            Element::Flame,
            &player,
            0,
            &mut list,
            AttackVia::Orb,
            0.0,
            &mut rng,
        );
        assert!(list[0].status.burn.active);
        assert_eq!(list[0].status.burn_damage, 5.0);
        assert_eq!(list[0].status.burn.duration, 4000.0);
    }

    #[test]
    fn test_water_freeze_duration_multiplier() {
        let mut player = Player::new(Vec2::ZERO);
        player.bonuses.freeze_chance = 1.0;
        player.bonuses.freeze_duration = 0.5;
        let mut list = enemies(&[Vec2::new(50.0, 0.0)]);
        let mut rng = GameRng::from_seed(1);
        apply_elemental_effect(
            Element::Water,
            &player,
            0,
            &mut list,
            AttackVia::Orb,
            0.0,
            &mut rng,
        );
        assert_eq!(list[0].status.freeze.duration, 3000.0);
    }

    #[test]
    fn test_chain_lightning_picks_nearest_other() {
        let mut player = Player::new(Vec2::ZERO);
        player.flags.has_chain_lightning = true;
        let mut list = enemies(&[Vec2::new(0.0, 0.0), Vec2::new(90.0, 0.0), Vec2::new(40.0, 0.0)]);
        let mut rng = GameRng::from_seed(1);
        let outcome = apply_elemental_effect(
            Element::Electric,
            &player,
            0,
            &mut list,
            AttackVia::Lightning,
            0.0,
            &mut rng,
        );
        let chain = outcome.chain.unwrap();
        assert_eq!(chain.target, 2);
        assert_eq!(chain.damage, player.damage * CHAIN_DAMAGE_FACTOR);

        let again = apply_elemental_effect(
            Element::Electric,
            &player,
            2,
            &mut list,
            AttackVia::Chain,
            0.0,
            &mut rng,
        );
        assert!(again.chain.is_none());
    }

    #[test]
    fn test_wind_boomerang_never_sleeps() {
        let mut player = Player::new(Vec2::ZERO);
        player.bonuses.sleep_chance = 1.0;
        let mut list = enemies(&[Vec2::new(50.0, 0.0)]);
        let mut rng = GameRng::from_seed(1);
        let outcome = apply_elemental_effect(
            Element::Wind,
            &player,
            0,
            &mut list,
            AttackVia::Boomerang,
            0.0,
            &mut rng,
        );
        assert!(outcome.knocked_back);
        assert!(!list[0].status.sleep.active);
        assert!(list[0].velocity.x > 0.0);

        apply_elemental_effect(Element::Wind, &player, 0, &mut list, AttackVia::Orb, 0.0, &mut rng);
        assert!(list[0].status.sleep.active);
    }

    #[test]
    fn test_gravity_event_horizon_slows_neighbours() {
        let mut player = Player::new(Vec2::ZERO);
        player.flags.has_event_horizon = true;
        let mut list = enemies(&[Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0), Vec2::new(500.0, 0.0)]);
        let mut rng = GameRng::from_seed(1);
        apply_elemental_effect(
            Element::Gravity,
            &player,
            0,
            &mut list,
            AttackVia::Orb,
            0.0,
            &mut rng,
        );
        assert!(list[0].status.slow.active);
        assert!(list[1].status.slow.active);
        assert!(!list[2].status.slow.active);
    }
}
