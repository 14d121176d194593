//! Wave Scheduler
//!
//! Wave bookkeeping: how many enemies the wave needs, how many have been
//! spawned, how many are alive, and whether the wave is done.
//!
//! ```text
//! Idle -> Spawning -> AllSpawnedWaitingForClear -> Completing -> (2s) -> Spawning
//! ```
//!
//! The scheduler never spawns or waits by itself. The combat loop turns the
//! plan returned by `start_wave` into timed spawn events, calls the
//! `on_*` hooks as enemies appear and die, and asks `completion_check`
//! every frame.

use bevy::prelude::*;

use super::components::Player;
use super::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavePhase {
    Idle,
    Spawning,
    AllSpawnedWaitingForClear,
    Completing,
}

/// What the combat loop must do to start a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStartPlan {
    pub wave: u32,
    /// Spawn one boss immediately.
    pub spawn_boss: bool,
    /// Regular spawns to schedule at the spawn interval.
    pub timed_spawns: u32,
}

/// Result of completing a wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveCompletion {
    pub completed_wave: u32,
    pub next_wave: u32,
    pub next_enemy_count: u32,
    pub healed: f32,
    /// Delay before the next `start_wave`.
    pub next_start_delay_ms: f64,
}

#[derive(Clone, Debug)]
pub struct WaveScheduler {
    pub wave_number: u32,
    pub enemies_this_wave: u32,
    /// Timed (regular) spawns made this wave. The boss is not counted.
    pub enemies_spawned: u32,
    pub enemies_alive: u32,
    pub is_boss_wave: bool,
    /// Set before completion side effects; cleared by `start_wave`.
    pub completing: bool,
    pub phase: WavePhase,
    /// Cap enemies per wave for reduced-capability devices.
    pub reduced_capability: bool,
}

impl Default for WaveScheduler {
    fn default() -> Self {
        Self::new(false)
    }
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

impl WaveScheduler {
    pub fn new(reduced_capability: bool) -> Self {
        Self {
            wave_number: 1,
            enemies_this_wave: INITIAL_ENEMIES_PER_WAVE,
            enemies_spawned: 0,
            enemies_alive: 0,
            is_boss_wave: false,
            completing: false,
            phase: WavePhase::Idle,
            reduced_capability,
        }
    }

    /// Reset counters for the current wave number and describe its spawns.
    pub fn start_wave(&mut self) -> WaveStartPlan {
        self.enemies_spawned = 0;
        self.enemies_alive = 0;
        self.completing = false;
        self.is_boss_wave = is_boss_wave(self.wave_number);
        self.phase = WavePhase::Spawning;

        let plan = if self.is_boss_wave {
            WaveStartPlan {
                wave: self.wave_number,
                spawn_boss: true,
                timed_spawns: BOSS_WAVE_ESCORTS,
            }
        } else {
            WaveStartPlan {
                wave: self.wave_number,
                spawn_boss: false,
                timed_spawns: self.enemies_this_wave,
            }
        };
        info!(
            "Wave {} started ({} timed spawns{})",
            plan.wave,
            plan.timed_spawns,
            if plan.spawn_boss { " + boss" } else { "" }
        );
        plan
    }

    /// Enemies the wave needs in total (boss included on boss waves).
    pub fn required_total(&self) -> u32 {
        if self.is_boss_wave {
            BOSS_WAVE_ESCORTS + 1
        } else {
            self.enemies_this_wave
        }
    }

    /// Enemies spawned so far (boss included on boss waves).
    pub fn spawned_total(&self) -> u32 {
        if self.is_boss_wave {
            self.enemies_spawned + 1
        } else {
            self.enemies_spawned
        }
    }

    /// Whether a timed spawn is still owed this wave.
    pub fn wants_spawn(&self) -> bool {
        self.phase == WavePhase::Spawning && self.spawned_total() < self.required_total()
    }

    pub fn on_enemy_spawned(&mut self) {
        self.enemies_spawned += 1;
        self.enemies_alive += 1;
        if self.phase == WavePhase::Spawning && self.spawned_total() >= self.required_total() {
            self.phase = WavePhase::AllSpawnedWaitingForClear;
        }
    }

    pub fn on_boss_spawned(&mut self) {
        self.enemies_alive += 1;
    }

    /// An enemy added outside the spawn plan. The wave waits for it to die
    /// but it does not count toward the wave's required spawns.
    pub fn on_extra_enemy_spawned(&mut self) {
        self.enemies_alive += 1;
    }

    pub fn on_enemy_killed(&mut self) {
        self.enemies_alive = self.enemies_alive.saturating_sub(1);
    }

    /// True exactly once per wave: when every required enemy has spawned and
    /// none are alive. Sets the completion guard before returning true.
    pub fn completion_check(&mut self) -> bool {
        if self.completing || self.phase == WavePhase::Idle {
            return false;
        }
        if self.spawned_total() >= self.required_total() && self.enemies_alive == 0 {
            self.completing = true;
            self.phase = WavePhase::Completing;
            return true;
        }
        false
    }

    /// Advance to the next wave, grow its size, and heal the player.
    pub fn complete_wave(&mut self, player: &mut Player) -> WaveCompletion {
        let completed_wave = self.wave_number;
        self.wave_number += 1;

        let grown = (self.enemies_this_wave as f64 * WAVE_GROWTH_FACTOR).floor() as u32;
        self.enemies_this_wave = if self.reduced_capability {
            grown.min(REDUCED_CAPABILITY_ENEMY_CAP)
        } else {
            grown
        };

        let healed = player.heal(player.max_health * WAVE_CLEAR_HEAL_FRACTION);

        info!(
            "Wave {} complete; next wave {} with {} enemies (healed {:.0})",
            completed_wave, self.wave_number, self.enemies_this_wave, healed
        );

        WaveCompletion {
            completed_wave,
            next_wave: self.wave_number,
            next_enemy_count: self.enemies_this_wave,
            healed,
            next_start_delay_ms: NEXT_WAVE_DELAY_MS,
        }
    }
}
