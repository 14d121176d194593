//! Simulation Constants
//!
//! Centralized location for the numbers that drive wave pacing, status
//! effects, elemental procs and attack patterns. All durations are in
//! milliseconds of game time, all distances in world pixels.

// ============================================================================
// Waves
// ============================================================================

/// Enemies required in wave 1.
pub const INITIAL_ENEMIES_PER_WAVE: u32 = 5;

/// Growth factor applied (then floored) to the enemy count on each completion.
pub const WAVE_GROWTH_FACTOR: f64 = 1.3;

/// Cap on enemies per wave under the reduced-capability device policy.
pub const REDUCED_CAPABILITY_ENEMY_CAP: u32 = 15;

/// Every Nth wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 5;

/// Regular enemies accompanying the boss on a boss wave.
pub const BOSS_WAVE_ESCORTS: u32 = 3;

/// Interval between timed spawns within a wave.
pub const SPAWN_INTERVAL_MS: f64 = 800.0;

/// Delay between a wave completing and the next one starting.
pub const NEXT_WAVE_DELAY_MS: f64 = 2000.0;

/// Fraction of max health restored when a wave completes.
pub const WAVE_CLEAR_HEAL_FRACTION: f32 = 0.25;

// ============================================================================
// Player
// ============================================================================

pub const PLAYER_BASE_HEALTH: f32 = 100.0;
pub const PLAYER_BASE_DAMAGE: f32 = 10.0;
pub const PLAYER_BASE_SPEED: f32 = 200.0;
pub const PLAYER_BASE_DEFENSE: f32 = 0.0;

/// Experience needed for the first level-up.
pub const INITIAL_XP_TO_NEXT: u32 = 20;

/// Growth factor (floored) for the experience requirement per level.
pub const XP_GROWTH_FACTOR: f32 = 1.25;

/// Invulnerability window after the player takes a hit.
pub const INVULNERABILITY_MS: f64 = 1000.0;

/// Base radius in which XP orbs are collected.
pub const XP_PICKUP_RADIUS: f32 = 60.0;

/// Contact distance between player and enemy bodies.
pub const CONTACT_RADIUS: f32 = 32.0;

/// Closest an enemy body gets to the player's center. Inside
/// `CONTACT_RADIUS`, so enemies held here still deal contact damage.
pub const ENEMY_STANDOFF_DISTANCE: f32 = 28.0;

/// Base critical strike multiplier (upgrades add to it).
pub const BASE_CRIT_MULTIPLIER: f32 = 2.0;

// ============================================================================
// Status Effects
// ============================================================================

pub const BURN_BASE_DAMAGE: f32 = 3.0;
pub const BURN_BASE_DURATION_MS: f64 = 3000.0;
pub const BURN_TICK_MS: f64 = 1000.0;

pub const FREEZE_BASE_CHANCE: f32 = 0.5;
pub const FREEZE_BASE_DURATION_MS: f64 = 2000.0;

pub const PARALYZE_BASE_CHANCE: f32 = 0.5;
pub const PARALYZE_DURATION_MS: f64 = 1000.0;
pub const PARALYZE_TICK_MS: f64 = 500.0;

pub const POISON_BASE_DAMAGE: f32 = 2.0;
pub const POISON_DURATION_MS: f64 = 6000.0;
pub const POISON_TICK_MS: f64 = 2000.0;

/// Chance that an exploding nature seed poisons what it hits.
pub const SEED_POISON_BASE_CHANCE: f32 = 0.3;

pub const SLEEP_BASE_CHANCE: f32 = 0.5;
pub const SLEEP_DURATION_MS: f64 = 2000.0;

pub const CHARM_BASE_CHANCE: f32 = 0.5;
pub const CHARM_BASE_DURATION_MS: f64 = 3000.0;

pub const CONFUSION_BASE_CHANCE: f32 = 0.5;
pub const CONFUSION_BASE_DURATION_MS: f64 = 2000.0;
pub const CONFUSION_TICK_MS: f64 = 1000.0;
pub const CONFUSION_PULSE_RADIUS: f32 = 50.0;
/// Fraction of player damage dealt by a confusion pulse.
pub const CONFUSION_PULSE_FACTOR: f32 = 0.25;

pub const FEAR_BASE_CHANCE: f32 = 0.5;
pub const FEAR_BASE_DURATION_MS: f64 = 2000.0;

pub const BLIND_BASE_CHANCE: f32 = 0.5;
pub const BLIND_DURATION_MS: f64 = 3000.0;

pub const SLOW_BASE_AMOUNT: f32 = 0.4;
pub const SLOW_DURATION_MS: f64 = 3000.0;
/// Slow can never fully stop an enemy.
pub const SLOW_MAX_AMOUNT: f32 = 0.9;

/// Terra stun upgrade duration (modelled as a short paralysis).
pub const TERRA_STUN_MS: f64 = 500.0;

/// Radius for burn/poison spread between enemies.
pub const SPREAD_RADIUS: f32 = 60.0;

// ============================================================================
// Elemental Procs
// ============================================================================

pub const WIND_KNOCKBACK_POWER: f32 = 200.0;
pub const TERRA_KNOCKBACK_POWER: f32 = 300.0;
pub const TERRA_AREA_KNOCKBACK_RADIUS: f32 = 80.0;
pub const GRAVITY_AOE_SLOW_RADIUS: f32 = 100.0;

pub const CHAIN_RADIUS: f32 = 100.0;
pub const CHAIN_DAMAGE_FACTOR: f32 = 0.5;

/// How long a knockback impulse overrides AI steering.
pub const KNOCKBACK_WINDOW_MS: f64 = 200.0;

/// Damage multiplier applied to tanks from generic sources.
pub const TANK_DAMAGE_TAKEN: f32 = 0.5;
/// Damage multiplier applied to tanks once the anti-tank upgrade is owned.
pub const ANTI_TANK_DAMAGE_TAKEN: f32 = 1.25;

// ============================================================================
// Enemy AI
// ============================================================================

/// Heading toward the player is recomputed only every Nth frame.
pub const AI_HEADING_REFRESH_FRAMES: u64 = 3;

/// How long a confused enemy holds one random heading.
pub const CONFUSION_HEADING_HOLD_MS: f64 = 500.0;

/// Status tint/particle visuals are emitted every Nth frame.
pub const STATUS_VISUAL_FRAMES: u64 = 5;

pub const BOMBER_TRIGGER_RADIUS: f32 = 50.0;
pub const BOMBER_BLAST_RADIUS: f32 = 80.0;

/// Boss cannot use its special attack during this window after spawning.
pub const BOSS_GRACE_MS: f64 = 5000.0;
pub const BOSS_LASER_COOLDOWN_MS: f64 = 6000.0;
pub const BOSS_LASER_TELEGRAPH_MS: f64 = 1000.0;
pub const BOSS_LASER_LENGTH: f32 = 800.0;
pub const BOSS_LASER_HALF_WIDTH: f32 = 15.0;
pub const BOSS_LASER_DAMAGE_FACTOR: f32 = 1.5;

/// Distance from the player at which enemies appear.
pub const SPAWN_DISTANCE: f32 = 450.0;

// ============================================================================
// Attacks
// ============================================================================

pub const ORB_BASE_COUNT: u32 = 3;
pub const ORB_RADIUS: f32 = 80.0;
pub const ORB_ANGULAR_SPEED: f32 = 3.0;
pub const ORB_HIT_RADIUS: f32 = 20.0;
/// Half-width of the wedge each orb sweeps between the player and its ring.
pub const ORB_SWEEP_HALF_ARC: f32 = 0.45;
pub const ORB_HIT_COOLDOWN_MS: f64 = 500.0;

pub const LIGHTNING_INTERVAL_MS: f64 = 1200.0;
pub const LIGHTNING_RANGE: f32 = 300.0;

pub const SEED_INTERVAL_MS: f64 = 2000.0;
pub const SEED_FUSE_MS: f64 = 1500.0;
pub const SEED_BLAST_RADIUS: f32 = 70.0;

pub const QUAKE_INTERVAL_MS: f64 = 2500.0;
pub const QUAKE_RADIUS: f32 = 140.0;

pub const BOOMERANG_INTERVAL_MS: f64 = 1500.0;
pub const BOOMERANG_SPEED: f32 = 350.0;
pub const BOOMERANG_RANGE: f32 = 300.0;
pub const BOOMERANG_HIT_RADIUS: f32 = 24.0;

pub const CLONE_INTERVAL_MS: f64 = 1500.0;
pub const CLONE_RANGE: f32 = 200.0;
pub const CLONE_DAMAGE_FACTOR: f32 = 0.5;
pub const CLONE_OFFSET: f32 = 60.0;

// ============================================================================
// Presentation
// ============================================================================

/// Floating damage numbers kept at once; the oldest is recycled.
pub const MAX_DAMAGE_NUMBERS: usize = 50;

// ============================================================================
// Arena
// ============================================================================

pub const DEFAULT_ARENA_WIDTH: f32 = 1600.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 1200.0;
