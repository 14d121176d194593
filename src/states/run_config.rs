//! Run configuration
//!
//! Balance and policy knobs fixed for the length of one run.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::play_run::constants::{
    DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH, INITIAL_ENEMIES_PER_WAVE,
};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Cap enemies per wave (for low-end devices).
    #[serde(default)]
    pub reduced_capability: bool,
    #[serde(default = "default_arena_width")]
    pub arena_width: f32,
    #[serde(default = "default_arena_height")]
    pub arena_height: f32,
    /// Wave the run starts on (testing and balance runs).
    #[serde(default = "default_starting_wave")]
    pub starting_wave: u32,
    /// Enemy count for the starting wave.
    #[serde(default = "default_starting_enemies")]
    pub starting_enemies: u32,
}

fn default_arena_width() -> f32 {
    DEFAULT_ARENA_WIDTH
}

fn default_arena_height() -> f32 {
    DEFAULT_ARENA_HEIGHT
}

fn default_starting_wave() -> u32 {
    1
}

fn default_starting_enemies() -> u32 {
    INITIAL_ENEMIES_PER_WAVE
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            reduced_capability: false,
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            starting_wave: 1,
            starting_enemies: INITIAL_ENEMIES_PER_WAVE,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(format!(
                "Arena size must be positive (got {}x{})",
                self.arena_width, self.arena_height
            ));
        }
        if self.starting_wave == 0 {
            return Err("starting_wave must be at least 1".to_string());
        }
        if self.starting_enemies == 0 {
            return Err("starting_enemies must be at least 1".to_string());
        }
        Ok(())
    }
}
