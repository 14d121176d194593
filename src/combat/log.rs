//! Combat logging
//!
//! Records run events for post-run analysis. Entries carry a human-readable
//! message plus optional structured data so aggregate queries do not have to
//! parse text.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use serde::Serialize;

use super::events::{PlayerHurtSource, RunEvent};
use crate::states::play_run::combat_loop::RunSummary;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in game time (seconds since run start)
    pub timestamp: f64,
    pub event_type: CombatLogEventType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage dealt to an enemy
    Damage,
    /// Enemy died
    Death,
    /// Damage taken by the player
    PlayerHurt,
    /// Wave started or completed
    Wave,
    /// Level-ups, element and upgrade picks
    Progression,
    /// Run start and end
    RunMilestone,
}

/// Machine-readable payload for entries that feed aggregate queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StructuredEventData {
    Damage {
        source: String,
        target: String,
        amount: f32,
        critical: bool,
    },
    Kill {
        kind: String,
        rewarded: bool,
    },
    PlayerHurt {
        source: String,
        amount: f32,
    },
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current game time in seconds
    pub run_time: f64,
}

#[derive(Serialize)]
struct SavedRunLog<'a> {
    summary: &'a RunSummary,
    damage_by_source: HashMap<String, f32>,
    kills_by_kind: HashMap<String, u32>,
    entries: &'a [CombatLogEntry],
}

fn hurt_source_name(source: PlayerHurtSource) -> String {
    match source {
        PlayerHurtSource::Contact(kind) => kind.name().to_string(),
        PlayerHurtSource::BomberBlast => "Bomber Blast".to_string(),
        PlayerHurtSource::BossLaser => "Boss Laser".to_string(),
    }
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.run_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    fn push(
        &mut self,
        event_type: CombatLogEventType,
        message: String,
        data: Option<StructuredEventData>,
    ) {
        self.entries.push(CombatLogEntry {
            timestamp: self.run_time,
            event_type,
            message,
            data,
        });
    }

    pub fn log_damage(
        &mut self,
        source: String,
        target: String,
        amount: f32,
        critical: bool,
        message: String,
    ) {
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                source,
                target,
                amount,
                critical,
            }),
        );
    }

    pub fn log_kill(&mut self, kind: String, rewarded: bool, message: String) {
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Kill { kind, rewarded }),
        );
    }

    pub fn log_player_hurt(&mut self, source: String, amount: f32, message: String) {
        self.push(
            CombatLogEventType::PlayerHurt,
            message,
            Some(StructuredEventData::PlayerHurt { source, amount }),
        );
    }

    /// Translate a gameplay event into a log entry.
    pub fn log_run_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::WaveStarted { wave, boss_wave } => {
                let suffix = if *boss_wave { " (boss wave)" } else { "" };
                self.log(CombatLogEventType::Wave, format!("Wave {} started{}", wave, suffix));
            }
            RunEvent::WaveCompleted { wave, healed } => {
                self.log(
                    CombatLogEventType::Wave,
                    format!("Wave {} cleared, healed {:.0}", wave, healed),
                );
            }
            RunEvent::BossSpawned { wave } => {
                self.log(CombatLogEventType::Wave, format!("Boss spawned on wave {}", wave));
            }
            RunEvent::EnemyDamaged {
                kind,
                source,
                amount,
                critical,
            } => {
                let crit = if *critical { " (Critical)" } else { "" };
                let message = format!(
                    "{} hits {} for {:.0}{}",
                    source.name(),
                    kind.name(),
                    amount,
                    crit
                );
                self.log_damage(
                    source.name().to_string(),
                    kind.name().to_string(),
                    *amount,
                    *critical,
                    message,
                );
            }
            RunEvent::EnemyKilled { kind, xp, rewarded, .. } => {
                let message = if *rewarded {
                    format!("{} slain (+{} XP)", kind.name(), xp)
                } else {
                    format!("{} detonated", kind.name())
                };
                self.log_kill(kind.name().to_string(), *rewarded, message);
            }
            RunEvent::PlayerDamaged { source, amount } => {
                let name = hurt_source_name(*source);
                let message = format!("Player takes {:.0} from {}", amount, name);
                self.log_player_hurt(name, *amount, message);
            }
            RunEvent::LevelUp { level } => {
                self.log(CombatLogEventType::Progression, format!("Reached level {}", level));
            }
            RunEvent::ElementChosen { element } => {
                self.log(CombatLogEventType::Progression, format!("Chose element {}", element));
            }
            RunEvent::UpgradeChosen { upgrade, stacks } => {
                self.log(
                    CombatLogEventType::Progression,
                    format!("Took upgrade {:?} (x{})", upgrade, stacks),
                );
            }
            RunEvent::GameOver { summary } => {
                self.log(
                    CombatLogEventType::RunMilestone,
                    format!(
                        "Game over on wave {} with score {}",
                        summary.wave_reached, summary.score
                    ),
                );
            }
        }
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Damage dealt to enemies, keyed by what dealt it
    pub fn damage_by_source(&self) -> HashMap<String, f32> {
        let mut totals = HashMap::new();
        for entry in &self.entries {
            if let Some(StructuredEventData::Damage { source, amount, .. }) = &entry.data {
                *totals.entry(source.clone()).or_insert(0.0) += amount;
            }
        }
        totals
    }

    pub fn total_damage_dealt(&self) -> f32 {
        self.damage_by_source().values().sum()
    }

    pub fn total_damage_taken(&self) -> f32 {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::PlayerHurt { amount, .. }) => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Rewarded kills keyed by enemy kind
    pub fn kills_by_kind(&self) -> HashMap<String, u32> {
        let mut kills = HashMap::new();
        for entry in &self.entries {
            if let Some(StructuredEventData::Kill { kind, rewarded: true }) = &entry.data {
                *kills.entry(kind.clone()).or_insert(0) += 1;
            }
        }
        kills
    }

    /// Write the log and run summary as JSON. Returns the path written.
    pub fn save_to_file(
        &self,
        summary: &RunSummary,
        output_path: Option<&str>,
    ) -> Result<String, String> {
        let path = match output_path {
            Some(path) => path.to_string(),
            None => {
                let stamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_err(|e| format!("System clock error: {}", e))?
                    .as_secs();
                format!("run_logs/run_{}.json", stamp)
            }
        };

        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }

        let saved = SavedRunLog {
            summary,
            damage_by_source: self.damage_by_source(),
            kills_by_kind: self.kills_by_kind(),
            entries: &self.entries,
        };
        let json = serde_json::to_string_pretty(&saved)
            .map_err(|e| format!("Failed to serialize run log: {}", e))?;
        fs::write(&path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        Ok(path)
    }
}

