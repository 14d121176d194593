//! Run Data Definitions
//!
//! Plain data for everything the simulation owns during a run: the player,
//! enemies, XP orbs, and the seeded random source. The `CombatLoop`
//! orchestrator owns all of these; nothing here is a global.

use bevy::math::Vec2;
use bevy::prelude::Resource;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::constants::*;
use super::elements::{AttackMode, Element};
use super::status_effects::StatusEffects;
use super::upgrades::UpgradeId;

// ============================================================================
// Random Source
// ============================================================================

/// Seeded random number generator for deterministic run simulation.
///
/// When a seed is provided (e.g., via headless config), the same seed and
/// the same inputs always produce the same run. Without a seed, uses system
/// entropy.
#[derive(Resource)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic)
    pub seed: Option<u64>,
}

impl GameRng {
    /// Create a new GameRng with a specific seed for deterministic behavior
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// Create a new GameRng with random entropy (non-deterministic)
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            seed: None,
        }
    }

    /// Generate a random f32 in the range [0.0, 1.0)
    pub fn random_f32(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Generate a random f32 in the given range
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.random_f32() * (max - min)
    }

    /// Returns true with the given probability. Chances at or above 1.0
    /// always succeed, chances at or below 0.0 never do.
    pub fn roll(&mut self, chance: f32) -> bool {
        self.random_f32() < chance
    }

    /// Uniform angle in radians.
    pub fn random_angle(&mut self) -> f32 {
        self.random_f32() * std::f32::consts::TAU
    }

    /// Pick up to `amount` distinct items.
    pub fn choose_multiple<T: Clone>(&mut self, items: &[T], amount: usize) -> Vec<T> {
        items
            .choose_multiple(&mut self.rng, amount)
            .cloned()
            .collect()
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

// ============================================================================
// Player
// ============================================================================

/// Additive bonuses granted by stackable upgrades.
///
/// Every field is the accumulated bonus only (default zero); base values live
/// in `constants` and the accessor methods combine the two.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerBonuses {
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub life_steal: f32,
    pub thorns: f32,

    pub burn_damage: f32,
    pub burn_duration_ms: f32,
    pub burning_vulnerability: f32,

    pub freeze_chance: f32,
    pub freeze_duration: f32,
    pub frozen_vulnerability: f32,

    pub paralyze_chance: f32,
    pub paralyze_damage: f32,
    pub paralyzed_vulnerability: f32,

    pub poison_damage: f32,
    pub seed_poison_chance: f32,

    pub knockback: f32,
    pub sleep_chance: f32,

    pub slow_amount: f32,
    pub confusion_duration_ms: f32,

    pub charm_chance: f32,
    pub charm_duration_ms: f32,

    pub blind_chance: f32,
    pub blinded_vulnerability: f32,

    pub fear_chance: f32,
    pub fear_duration_ms: f32,
}

impl PlayerBonuses {
    pub fn crit_multiplier(&self) -> f32 {
        BASE_CRIT_MULTIPLIER + self.crit_multiplier
    }

    /// Multiplier on freeze duration (identity 1.0).
    pub fn freeze_duration_multiplier(&self) -> f32 {
        1.0 + self.freeze_duration
    }

    /// Multiplier on knockback power (identity 1.0).
    pub fn knockback_multiplier(&self) -> f32 {
        1.0 + self.knockback
    }
}

/// Binary capabilities granted by one-shot upgrades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub has_wildfire: bool,
    pub has_chain_lightning: bool,
    pub has_toxic_spread: bool,
    pub has_terra_stun: bool,
    pub has_area_knockback: bool,
    pub has_event_horizon: bool,
    pub has_mind_fracture: bool,
    pub has_anti_tank: bool,
    pub has_void_clone: bool,
}

/// The single player character of a run.
#[derive(Clone, Debug)]
pub struct Player {
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub defense: f32,
    /// None until the first level-up.
    pub element: Option<Element>,
    pub attack_mode: AttackMode,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub bonuses: PlayerBonuses,
    pub upgrade_stacks: HashMap<UpgradeId, u32>,
    pub flags: CapabilityFlags,
    /// Game time until which incoming hits are ignored.
    pub invulnerable_until: f64,
    pub orb_count: u32,
    pub boomerang_count: u32,
    pub pickup_radius: f32,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            health: PLAYER_BASE_HEALTH,
            max_health: PLAYER_BASE_HEALTH,
            damage: PLAYER_BASE_DAMAGE,
            speed: PLAYER_BASE_SPEED,
            defense: PLAYER_BASE_DEFENSE,
            element: None,
            attack_mode: AttackMode::Orbs,
            level: 1,
            xp: 0,
            xp_to_next: INITIAL_XP_TO_NEXT,
            bonuses: PlayerBonuses::default(),
            upgrade_stacks: HashMap::new(),
            flags: CapabilityFlags::default(),
            invulnerable_until: 0.0,
            orb_count: ORB_BASE_COUNT,
            boomerang_count: 1,
            pickup_radius: XP_PICKUP_RADIUS,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }

    /// Heal, clamped to max health. Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }

    pub fn stacks(&self, id: UpgradeId) -> u32 {
        self.upgrade_stacks.get(&id).copied().unwrap_or(0)
    }

    /// Add experience; returns how many levels were gained.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        self.xp += amount;
        let mut levels = 0;
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = ((self.xp_to_next as f32) * XP_GROWTH_FACTOR).floor() as u32;
            levels += 1;
        }
        levels
    }
}

// ============================================================================
// Enemies
// ============================================================================

/// Stable identity of an enemy across frames (arena indices shift on compaction).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Closed set of enemy types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Stronger,
    Tank,
    Bomber,
    Boss,
}

impl EnemyKind {
    /// Numeric type tag (0 = basic, 1 = stronger, 2 = tank, 3 = bomber, 4 = boss).
    pub fn type_index(self) -> u8 {
        match self {
            EnemyKind::Basic => 0,
            EnemyKind::Stronger => 1,
            EnemyKind::Tank => 2,
            EnemyKind::Bomber => 3,
            EnemyKind::Boss => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Basic => "Basic",
            EnemyKind::Stronger => "Stronger",
            EnemyKind::Tank => "Tank",
            EnemyKind::Bomber => "Bomber",
            EnemyKind::Boss => "Boss",
        }
    }
}

/// A hostile unit.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    /// False once the kill path has run. Checked at the top of every
    /// per-enemy operation; removal happens in end-of-frame compaction.
    pub active: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub health: f32,
    pub max_health: f32,
    /// Current speed after slow is applied.
    pub speed: f32,
    /// Speed before slow modifiers.
    pub original_speed: f32,
    pub damage: f32,
    pub xp_value: u32,
    pub score_value: u32,
    pub status: StatusEffects,
    pub is_tank: bool,
    pub is_boss: bool,
    pub is_bomber: bool,
    /// Cached heading toward the player (radians), refreshed every few frames.
    pub heading: Option<f32>,
    pub confused_heading: f32,
    pub confused_heading_until: f64,
    pub knockback_until: f64,
    pub last_orb_hit: f64,
    pub spawned_at: f64,
    /// Boss only: game time at which the special attack is next allowed.
    pub special_ready_at: f64,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.active && self.health > 0.0
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(point)
    }

    pub fn health_pct(&self) -> f32 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }
}

/// Experience dropped by a slain enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XpOrb {
    pub position: Vec2,
    pub value: u32,
}

/// Per-run counters feeding the run summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub enemies_killed: u32,
    pub damage_taken: f32,
    pub damage_dealt: f32,
    pub score: u32,
}
