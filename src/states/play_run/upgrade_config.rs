//! Data-Driven Upgrade Catalog
//!
//! Upgrades are plain descriptors loaded from `assets/config/upgrades.ron`:
//! an id, display text, the element pool it belongs to (or none for the
//! universal pool), the effect it has, and an optional stack cap. The
//! `UpgradeEngine` interprets them; no upgrade carries code of its own.
//!
//! The catalog is embedded at compile time so the headless runner and the
//! tests never depend on the working directory.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::elements::Element;
use super::upgrades::UpgradeId;

const UPGRADES_RON: &str = include_str!("../../../assets/config/upgrades.ron");
const UPGRADES_PATH: &str = "assets/config/upgrades.ron";

/// Upgrades offered per element pool.
pub const UPGRADES_PER_ELEMENT: usize = 4;

/// Player attribute an upgrade scales.
///
/// Core stats (health, damage, speed, defense, counts, pickup radius) are
/// raised by `per_stack` on every pick. Bonus stats are recomputed from the
/// total stack count of every upgrade targeting them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKey {
    // === Core ===
    MaxHealth,
    Damage,
    Speed,
    Defense,
    OrbCount,
    BoomerangCount,
    PickupRadius,

    // === Bonuses ===
    CritChance,
    CritMultiplier,
    LifeSteal,
    Thorns,
    BurnDamage,
    BurnDuration,
    BurningVulnerability,
    FreezeChance,
    FreezeDuration,
    FrozenVulnerability,
    ParalyzeChance,
    ParalyzeDamage,
    ParalyzedVulnerability,
    PoisonDamage,
    SeedPoisonChance,
    Knockback,
    SleepChance,
    SlowAmount,
    ConfusionDuration,
    CharmChance,
    CharmDuration,
    BlindChance,
    BlindedVulnerability,
    FearChance,
    FearDuration,
}

impl StatKey {
    pub fn is_core(self) -> bool {
        matches!(
            self,
            StatKey::MaxHealth
                | StatKey::Damage
                | StatKey::Speed
                | StatKey::Defense
                | StatKey::OrbCount
                | StatKey::BoomerangCount
                | StatKey::PickupRadius
        )
    }
}

/// Binary capability granted once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityFlag {
    Wildfire,
    ChainLightning,
    ToxicSpread,
    TerraStun,
    AreaKnockback,
    EventHorizon,
    MindFracture,
    AntiTank,
}

/// What picking an upgrade does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    /// Linear per-stack increase of one stat.
    Stat { stat: StatKey, per_stack: f32 },
    /// Sets a capability flag; removed from the pool once owned.
    Flag(CapabilityFlag),
    /// Summons the shadow clone companion; removed from the pool once owned.
    SummonClone,
}

/// One upgrade descriptor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub name: String,
    pub description: String,
    /// Element pool this upgrade belongs to; `None` for the universal pool.
    #[serde(default)]
    pub element: Option<Element>,
    pub effect: UpgradeEffect,
    /// Maximum number of picks; `None` stacks without limit.
    #[serde(default)]
    pub max_stacks: Option<u32>,
}

impl UpgradeDef {
    pub fn is_one_shot(&self) -> bool {
        matches!(self.effect, UpgradeEffect::Flag(_) | UpgradeEffect::SummonClone)
    }
}

/// Root structure for the upgrades.ron file
#[derive(Debug, Serialize, Deserialize)]
pub struct UpgradesConfig {
    pub upgrades: Vec<UpgradeDef>,
}

/// Validated set of all upgrade descriptors.
#[derive(Resource, Clone, Debug)]
pub struct UpgradeCatalog {
    definitions: Vec<UpgradeDef>,
}

impl Default for UpgradeCatalog {
    /// Load the embedded catalog.
    /// Panics if the embedded file is invalid - use for tests only.
    fn default() -> Self {
        load_upgrade_catalog().expect("Failed to load upgrade catalog in Default impl")
    }
}

impl UpgradeCatalog {
    pub fn from_ron_str(contents: &str) -> Result<Self, String> {
        let config: UpgradesConfig =
            ron::from_str(contents).map_err(|e| format!("Failed to parse upgrades: {}", e))?;
        let catalog = Self {
            definitions: config.upgrades,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn get(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.definitions.iter().find(|def| def.id == id)
    }

    /// Get a definition, panicking if missing.
    /// Use this when the id must exist (validated at load).
    pub fn get_unchecked(&self, id: UpgradeId) -> &UpgradeDef {
        self.get(id)
            .unwrap_or_else(|| panic!("Upgrade {:?} not found in catalog", id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpgradeDef> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Universal pool plus the pool of `element` (if chosen).
    pub fn pool_for(&self, element: Option<Element>) -> impl Iterator<Item = &UpgradeDef> {
        self.definitions
            .iter()
            .filter(move |def| def.element.is_none() || def.element == element)
    }

    /// Check ids are unique and complete, every element has its pool, and
    /// caps are sane.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for def in &self.definitions {
            if !seen.insert(def.id) {
                return Err(format!("Duplicate upgrade id: {:?}", def.id));
            }
            if def.max_stacks == Some(0) {
                return Err(format!("Upgrade {:?} has max_stacks of 0", def.id));
            }
            if let UpgradeEffect::Stat { per_stack, .. } = def.effect {
                if per_stack <= 0.0 {
                    return Err(format!("Upgrade {:?} has non-positive per_stack", def.id));
                }
            }
        }

        let missing: Vec<UpgradeId> = UpgradeId::ALL
            .into_iter()
            .filter(|id| !seen.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(format!("Missing upgrade definitions: {:?}", missing));
        }

        for element in Element::ALL {
            let count = self
                .definitions
                .iter()
                .filter(|def| def.element == Some(element))
                .count();
            if count != UPGRADES_PER_ELEMENT {
                return Err(format!(
                    "Element {} has {} upgrades, expected {}",
                    element, count, UPGRADES_PER_ELEMENT
                ));
            }
        }

        if !self.definitions.iter().any(|def| def.element.is_none()) {
            return Err("Universal upgrade pool is empty".to_string());
        }

        Ok(())
    }
}

/// Load and validate the embedded upgrade catalog.
pub fn load_upgrade_catalog() -> Result<UpgradeCatalog, String> {
    let catalog = UpgradeCatalog::from_ron_str(UPGRADES_RON)
        .map_err(|e| format!("{} ({})", e, UPGRADES_PATH))?;
    info!("Loaded {} upgrade definitions from {}", catalog.len(), UPGRADES_PATH);
    Ok(catalog)
}

/// Bevy plugin for upgrade catalog loading
pub struct UpgradeConfigPlugin;

impl Plugin for UpgradeConfigPlugin {
    fn build(&self, app: &mut App) {
        match load_upgrade_catalog() {
            Ok(catalog) => {
                app.insert_resource(catalog);
            }
            Err(e) => {
                panic!("Failed to load upgrade catalog: {}", e);
            }
        }
    }
}
