//! Integration tests for the upgrade engine
//!
//! These tests verify that:
//! - Stacking upgrades add exactly `stacks x per_stack`
//! - One-shot and capped upgrades leave the offer pool once taken
//! - Element-specific upgrades are only offered after that element is chosen

use bevy::math::Vec2;
use wave_survival::states::play_run::components::{GameRng, Player};
use wave_survival::states::play_run::constants::PARALYZE_BASE_CHANCE;
use wave_survival::states::play_run::upgrade_config::StatKey;
use wave_survival::states::play_run::{
    Element, LevelUpChoice, UpgradeCatalog, UpgradeEngine, UpgradeId,
};

fn engine() -> UpgradeEngine {
    UpgradeEngine::new(UpgradeCatalog::default())
}

fn player_with(element: Element, engine: &UpgradeEngine) -> Player {
    let mut player = Player::new(Vec2::ZERO);
    engine.select_element(&mut player, element).unwrap();
    player
}

#[test]
fn test_paralyze_chance_stacks_additively() {
    let engine = engine();
    let mut player = player_with(Element::Electric, &engine);

    for _ in 0..3 {
        engine.apply_upgrade(&mut player, UpgradeId::ParalyzeChance).unwrap();
    }

    assert_eq!(player.stacks(UpgradeId::ParalyzeChance), 3);
    assert!((player.bonuses.paralyze_chance - 0.3).abs() < 1e-6);
    assert!((engine.bonus_total(&player, StatKey::ParalyzeChance) - 0.3).abs() < 1e-6);
    let effective = PARALYZE_BASE_CHANCE + player.bonuses.paralyze_chance;
    assert!((effective - (PARALYZE_BASE_CHANCE + 0.3)).abs() < 1e-6);
}

#[test]
fn test_stacking_has_no_cap_or_compounding() {
    let engine = engine();
    let mut player = Player::new(Vec2::ZERO);
    let base_damage = player.damage;
    for n in 1..=12 {
        engine.apply_upgrade(&mut player, UpgradeId::Power).unwrap();
        let per_stack = 5.0;
        assert_eq!(player.damage, base_damage + per_stack * n as f32);
    }
}

#[test]
fn test_max_health_upgrade_heals_by_delta() {
    let engine = engine();
    let mut player = Player::new(Vec2::ZERO);
    player.health = 50.0;
    engine.apply_upgrade(&mut player, UpgradeId::Vitality).unwrap();
    assert_eq!(player.max_health, 120.0);
    assert_eq!(player.health, 70.0);
}

#[test]
fn test_capped_upgrade_leaves_pool() {
    let engine = engine();
    let mut player = Player::new(Vec2::ZERO);
    engine.apply_upgrade(&mut player, UpgradeId::Armor).unwrap();
    engine.apply_upgrade(&mut player, UpgradeId::Armor).unwrap();
    assert!(engine.apply_upgrade(&mut player, UpgradeId::Armor).is_err());
    assert_eq!(player.stacks(UpgradeId::Armor), 2);

    let mut rng = GameRng::from_seed(4);
    for _ in 0..50 {
        assert!(!engine.generate_options(&player, &mut rng).contains(&UpgradeId::Armor));
    }
}

#[test]
fn test_one_shot_flag_upgrade_leaves_pool() {
    let engine = engine();
    let mut player = player_with(Element::Flame, &engine);
    engine.apply_upgrade(&mut player, UpgradeId::Wildfire).unwrap();
    assert!(player.flags.has_wildfire);
    assert!(engine.apply_upgrade(&mut player, UpgradeId::Wildfire).is_err());
}

#[test]
fn test_element_upgrades_need_matching_element() {
    let engine = engine();
    let mut player = player_with(Element::Water, &engine);
    assert!(engine.apply_upgrade(&mut player, UpgradeId::ParalyzeChance).is_err());
    assert_eq!(player.stacks(UpgradeId::ParalyzeChance), 0);

    let mut rng = GameRng::from_seed(8);
    for _ in 0..50 {
        for id in engine.generate_options(&player, &mut rng) {
            let def = engine.catalog().get(id).unwrap();
            assert!(def.element.is_none() || def.element == Some(Element::Water));
        }
    }
}

#[test]
fn test_first_choice_is_elements_then_upgrades() {
    let engine = engine();
    let mut rng = GameRng::from_seed(1);
    let mut player = Player::new(Vec2::ZERO);

    match engine.next_choice(&player, &mut rng) {
        LevelUpChoice::Elements(options) => {
            assert_eq!(options.len(), 3);
            engine.select_element(&mut player, options[0]).unwrap();
        }
        other => panic!("expected element choice, got {:?}", other),
    }
    assert!(matches!(engine.next_choice(&player, &mut rng), LevelUpChoice::Upgrades(_)));
    assert!(engine.select_element(&mut player, Element::Shadow).is_err());
}
