//! Run events
//!
//! Gameplay milestones emitted by the combat loop for logging and for any
//! host that wants to react (UI, persistence, analytics).

use bevy::prelude::*;

use crate::states::play_run::combat_loop::RunSummary;
use crate::states::play_run::components::EnemyKind;
use crate::states::play_run::elements::Element;
use crate::states::play_run::upgrades::UpgradeId;

/// Label for what dealt a hit, used in the combat log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitSource {
    Orb,
    Lightning,
    Seed,
    Quake,
    Boomerang,
    Clone,
    Chain,
    Pulse,
    Reflect,
    Burn,
    Poison,
    Paralyze,
}

impl HitSource {
    pub fn name(self) -> &'static str {
        match self {
            HitSource::Orb => "Orb",
            HitSource::Lightning => "Lightning",
            HitSource::Seed => "Seed",
            HitSource::Quake => "Quake",
            HitSource::Boomerang => "Boomerang",
            HitSource::Clone => "Void Clone",
            HitSource::Chain => "Chain Lightning",
            HitSource::Pulse => "Mind Fracture",
            HitSource::Reflect => "Thorns",
            HitSource::Burn => "Burn",
            HitSource::Poison => "Poison",
            HitSource::Paralyze => "Static Field",
        }
    }
}

/// What hurt the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerHurtSource {
    Contact(EnemyKind),
    BomberBlast,
    BossLaser,
}

/// Event fired for every gameplay milestone of a run
#[derive(Event, Debug, Clone, PartialEq)]
pub enum RunEvent {
    WaveStarted {
        wave: u32,
        boss_wave: bool,
    },
    WaveCompleted {
        wave: u32,
        healed: f32,
    },
    BossSpawned {
        wave: u32,
    },
    EnemyDamaged {
        kind: EnemyKind,
        source: HitSource,
        amount: f32,
        critical: bool,
    },
    EnemyKilled {
        kind: EnemyKind,
        xp: u32,
        score: u32,
        /// False for bomber self-destructs (no XP or score).
        rewarded: bool,
    },
    PlayerDamaged {
        source: PlayerHurtSource,
        amount: f32,
    },
    LevelUp {
        level: u32,
    },
    ElementChosen {
        element: Element,
    },
    UpgradeChosen {
        upgrade: UpgradeId,
        stacks: u32,
    },
    GameOver {
        summary: RunSummary,
    },
}
