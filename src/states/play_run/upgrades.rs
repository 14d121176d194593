//! Upgrade Engine
//!
//! Offers level-up choices and applies picked upgrades to the player.
//!
//! Two flows share this module:
//! - the first level-up offers three of the ten elements; picking one sets the
//!   player's element, its flat damage delta and its attack pattern
//! - every later level-up offers three distinct upgrades from the universal
//!   pool plus the chosen element's pool, skipping one-shot upgrades already
//!   owned and capped upgrades at their cap
//!
//! Stat upgrades stack linearly: after `n` picks of an upgrade worth `b` per
//! stack, the bonus it contributes is exactly `n * b`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::components::{CapabilityFlags, GameRng, Player, PlayerBonuses};
use super::elements::Element;
use super::upgrade_config::{CapabilityFlag, StatKey, UpgradeCatalog, UpgradeDef, UpgradeEffect};

/// Choices offered per level-up.
pub const CHOICES_PER_LEVEL: usize = 3;

/// Every upgrade in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeId {
    // Universal
    Vitality,
    Power,
    Swiftness,
    Armor,
    Precision,
    Brutality,
    Thornmail,
    ExtraOrb,
    Magnet,
    ArmorPiercer,
    // Flame
    BurnDamage,
    BurnDuration,
    Wildfire,
    Inferno,
    // Water
    FreezeChance,
    DeepFreeze,
    Shatter,
    HealingWaters,
    // Electric
    ParalyzeChance,
    ChainLightning,
    StaticField,
    Overload,
    // Nature
    PotentToxins,
    ToxicSpread,
    SeedBurst,
    Regrowth,
    // Wind
    GaleForce,
    DrowsyWinds,
    ExtraBoomerang,
    Windrunner,
    // Terra
    SeismicForce,
    StunningBlow,
    Aftershock,
    StoneSkin,
    // Gravity
    CrushingWeight,
    Disorient,
    EventHorizon,
    MindFracture,
    // Celestial
    CharmChance,
    LastingDevotion,
    Starfall,
    DivineFavor,
    // Radiant
    BlindingLight,
    SearingLight,
    LuminousOrbs,
    Sunburst,
    // Shadow
    Terror,
    Dread,
    VoidClone,
    SoulSiphon,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 50] = [
        UpgradeId::Vitality,
        UpgradeId::Power,
        UpgradeId::Swiftness,
        UpgradeId::Armor,
        UpgradeId::Precision,
        UpgradeId::Brutality,
        UpgradeId::Thornmail,
        UpgradeId::ExtraOrb,
        UpgradeId::Magnet,
        UpgradeId::ArmorPiercer,
        UpgradeId::BurnDamage,
        UpgradeId::BurnDuration,
        UpgradeId::Wildfire,
        UpgradeId::Inferno,
        UpgradeId::FreezeChance,
        UpgradeId::DeepFreeze,
        UpgradeId::Shatter,
        UpgradeId::HealingWaters,
        UpgradeId::ParalyzeChance,
        UpgradeId::ChainLightning,
        UpgradeId::StaticField,
        UpgradeId::Overload,
        UpgradeId::PotentToxins,
        UpgradeId::ToxicSpread,
        UpgradeId::SeedBurst,
        UpgradeId::Regrowth,
        UpgradeId::GaleForce,
        UpgradeId::DrowsyWinds,
        UpgradeId::ExtraBoomerang,
        UpgradeId::Windrunner,
        UpgradeId::SeismicForce,
        UpgradeId::StunningBlow,
        UpgradeId::Aftershock,
        UpgradeId::StoneSkin,
        UpgradeId::CrushingWeight,
        UpgradeId::Disorient,
        UpgradeId::EventHorizon,
        UpgradeId::MindFracture,
        UpgradeId::CharmChance,
        UpgradeId::LastingDevotion,
        UpgradeId::Starfall,
        UpgradeId::DivineFavor,
        UpgradeId::BlindingLight,
        UpgradeId::SearingLight,
        UpgradeId::LuminousOrbs,
        UpgradeId::Sunburst,
        UpgradeId::Terror,
        UpgradeId::Dread,
        UpgradeId::VoidClone,
        UpgradeId::SoulSiphon,
    ];
}

/// What a level-up offers.
#[derive(Clone, Debug, PartialEq)]
pub enum LevelUpChoice {
    Elements(Vec<Element>),
    Upgrades(Vec<UpgradeId>),
}

impl LevelUpChoice {
    pub fn len(&self) -> usize {
        match self {
            LevelUpChoice::Elements(options) => options.len(),
            LevelUpChoice::Upgrades(options) => options.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interprets the upgrade catalog against a player.
#[derive(Clone, Debug)]
pub struct UpgradeEngine {
    catalog: UpgradeCatalog,
}

impl UpgradeEngine {
    pub fn new(catalog: UpgradeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &UpgradeCatalog {
        &self.catalog
    }

    /// Three random elements for the first level-up.
    pub fn element_choices(&self, rng: &mut GameRng) -> Vec<Element> {
        rng.choose_multiple(&Element::ALL, CHOICES_PER_LEVEL)
    }

    /// Offer for the next level-up given the player's current state.
    pub fn next_choice(&self, player: &Player, rng: &mut GameRng) -> LevelUpChoice {
        match player.element {
            None => LevelUpChoice::Elements(self.element_choices(rng)),
            Some(_) => LevelUpChoice::Upgrades(self.generate_options(player, rng)),
        }
    }

    /// Whether `def` may still be offered to `player`.
    pub fn is_available(&self, player: &Player, def: &UpgradeDef) -> bool {
        if def.element.is_some() && def.element != player.element {
            return false;
        }
        let owned = match def.effect {
            UpgradeEffect::Flag(flag) => flag_is_set(&player.flags, flag),
            UpgradeEffect::SummonClone => player.flags.has_void_clone,
            UpgradeEffect::Stat { .. } => false,
        };
        if owned {
            return false;
        }
        match def.max_stacks {
            Some(max) => player.stacks(def.id) < max,
            None => true,
        }
    }

    /// Up to three distinct upgrades the player can still take.
    pub fn generate_options(&self, player: &Player, rng: &mut GameRng) -> Vec<UpgradeId> {
        let pool: Vec<UpgradeId> = self
            .catalog
            .pool_for(player.element)
            .filter(|def| self.is_available(player, def))
            .map(|def| def.id)
            .collect();
        rng.choose_multiple(&pool, CHOICES_PER_LEVEL)
    }

    /// First-level-up element pick. Fails if an element is already chosen.
    pub fn select_element(&self, player: &mut Player, element: Element) -> Result<(), String> {
        if let Some(current) = player.element {
            return Err(format!(
                "Element already chosen ({}); cannot switch to {}",
                current, element
            ));
        }
        let profile = element.profile();
        player.element = Some(element);
        player.damage += profile.damage_delta;
        player.attack_mode = profile.attack_mode;
        info!(
            "Element selected: {} (damage {:+}, attack {:?})",
            element, profile.damage_delta, profile.attack_mode
        );
        Ok(())
    }

    /// Apply one pick of `id`. Validation happens before any mutation, so an
    /// error leaves the player untouched.
    pub fn apply_upgrade(&self, player: &mut Player, id: UpgradeId) -> Result<(), String> {
        let def = self
            .catalog
            .get(id)
            .ok_or_else(|| format!("Unknown upgrade: {:?}", id))?;
        if !self.is_available(player, def) {
            return Err(format!("Upgrade {} is not available", def.name));
        }

        *player.upgrade_stacks.entry(id).or_insert(0) += 1;

        match def.effect {
            UpgradeEffect::Stat { stat, per_stack } if stat.is_core() => {
                apply_core_delta(player, stat, per_stack);
            }
            UpgradeEffect::Stat { stat, .. } => {
                let total = self.bonus_total(player, stat);
                if let Some(field) = bonus_field_mut(&mut player.bonuses, stat) {
                    *field = total;
                }
            }
            UpgradeEffect::Flag(flag) => set_flag(&mut player.flags, flag),
            UpgradeEffect::SummonClone => player.flags.has_void_clone = true,
        }

        info!("Upgrade applied: {} (stack {})", def.name, player.stacks(id));
        Ok(())
    }

    /// Total bonus contributed to `stat` by every owned upgrade.
    pub fn bonus_total(&self, player: &Player, stat: StatKey) -> f32 {
        self.catalog
            .iter()
            .filter_map(|def| match def.effect {
                UpgradeEffect::Stat { stat: s, per_stack } if s == stat => {
                    Some(player.stacks(def.id) as f32 * per_stack)
                }
                _ => None,
            })
            .sum()
    }
}

fn apply_core_delta(player: &mut Player, stat: StatKey, delta: f32) {
    match stat {
        StatKey::MaxHealth => {
            player.max_health += delta;
            player.health += delta;
        }
        StatKey::Damage => player.damage += delta,
        StatKey::Speed => player.speed += delta,
        StatKey::Defense => player.defense += delta,
        StatKey::OrbCount => player.orb_count += delta as u32,
        StatKey::BoomerangCount => player.boomerang_count += delta as u32,
        StatKey::PickupRadius => player.pickup_radius += delta,
        _ => {}
    }
}

fn bonus_field_mut(bonuses: &mut PlayerBonuses, stat: StatKey) -> Option<&mut f32> {
    let field = match stat {
        StatKey::CritChance => &mut bonuses.crit_chance,
        StatKey::CritMultiplier => &mut bonuses.crit_multiplier,
        StatKey::LifeSteal => &mut bonuses.life_steal,
        StatKey::Thorns => &mut bonuses.thorns,
        StatKey::BurnDamage => &mut bonuses.burn_damage,
        StatKey::BurnDuration => &mut bonuses.burn_duration_ms,
        StatKey::BurningVulnerability => &mut bonuses.burning_vulnerability,
        StatKey::FreezeChance => &mut bonuses.freeze_chance,
        StatKey::FreezeDuration => &mut bonuses.freeze_duration,
        StatKey::FrozenVulnerability => &mut bonuses.frozen_vulnerability,
        StatKey::ParalyzeChance => &mut bonuses.paralyze_chance,
        StatKey::ParalyzeDamage => &mut bonuses.paralyze_damage,
        StatKey::ParalyzedVulnerability => &mut bonuses.paralyzed_vulnerability,
        StatKey::PoisonDamage => &mut bonuses.poison_damage,
        StatKey::SeedPoisonChance => &mut bonuses.seed_poison_chance,
        StatKey::Knockback => &mut bonuses.knockback,
        StatKey::SleepChance => &mut bonuses.sleep_chance,
        StatKey::SlowAmount => &mut bonuses.slow_amount,
        StatKey::ConfusionDuration => &mut bonuses.confusion_duration_ms,
        StatKey::CharmChance => &mut bonuses.charm_chance,
        StatKey::CharmDuration => &mut bonuses.charm_duration_ms,
        StatKey::BlindChance => &mut bonuses.blind_chance,
        StatKey::BlindedVulnerability => &mut bonuses.blinded_vulnerability,
        StatKey::FearChance => &mut bonuses.fear_chance,
        StatKey::FearDuration => &mut bonuses.fear_duration_ms,
        _ => return None,
    };
    Some(field)
}

fn flag_is_set(flags: &CapabilityFlags, flag: CapabilityFlag) -> bool {
    match flag {
        CapabilityFlag::Wildfire => flags.has_wildfire,
        CapabilityFlag::ChainLightning => flags.has_chain_lightning,
        CapabilityFlag::ToxicSpread => flags.has_toxic_spread,
        CapabilityFlag::TerraStun => flags.has_terra_stun,
        CapabilityFlag::AreaKnockback => flags.has_area_knockback,
        CapabilityFlag::EventHorizon => flags.has_event_horizon,
        CapabilityFlag::MindFracture => flags.has_mind_fracture,
        CapabilityFlag::AntiTank => flags.has_anti_tank,
    }
}

fn set_flag(flags: &mut CapabilityFlags, flag: CapabilityFlag) {
    match flag {
        CapabilityFlag::Wildfire => flags.has_wildfire = true,
        CapabilityFlag::ChainLightning => flags.has_chain_lightning = true,
        CapabilityFlag::ToxicSpread => flags.has_toxic_spread = true,
        CapabilityFlag::TerraStun => flags.has_terra_stun = true,
        CapabilityFlag::AreaKnockback => flags.has_area_knockback = true,
        CapabilityFlag::EventHorizon => flags.has_event_horizon = true,
        CapabilityFlag::MindFracture => flags.has_mind_fracture = true,
        CapabilityFlag::AntiTank => flags.has_anti_tank = true,
    }
}
