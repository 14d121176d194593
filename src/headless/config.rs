//! JSON configuration parsing for headless mode
//!
//! Parses JSON run configurations and converts them to the game's RunConfig
//! format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::states::play_run::constants::INITIAL_ENEMIES_PER_WAVE;
use crate::states::play_run::elements::Element;
use crate::states::run_config::RunConfig;

/// Headless run configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlessRunConfig {
    /// Random seed for deterministic run reproduction
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Maximum game time in seconds before the run is stopped (default: 300)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
    /// Elements the auto-picker prefers, in order (e.g. "Flame", "Gravity")
    #[serde(default)]
    pub preferred_elements: Vec<String>,
    /// Cap enemies per wave
    #[serde(default)]
    pub reduced_capability: bool,
    /// Wave to start on (default: 1)
    #[serde(default = "default_starting_wave")]
    pub starting_wave: u32,
    /// Custom output path for the run log (optional)
    #[serde(default)]
    pub output_path: Option<String>,
}

fn default_max_duration() -> f32 {
    300.0
}

fn default_starting_wave() -> u32 {
    1
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            max_duration_secs: default_max_duration(),
            preferred_elements: Vec::new(),
            reduced_capability: false,
            starting_wave: default_starting_wave(),
            output_path: None,
        }
    }
}

impl HeadlessRunConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: HeadlessRunConfig =
            serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_duration_secs <= 0.0 {
            return Err("max_duration_secs must be positive".to_string());
        }
        if self.starting_wave == 0 {
            return Err("starting_wave must be at least 1".to_string());
        }
        self.preferred_elements()?;
        Ok(())
    }

    /// Parse the preferred element names
    pub fn preferred_elements(&self) -> Result<Vec<Element>, String> {
        self.preferred_elements
            .iter()
            .map(|name| Element::from_name(name))
            .collect()
    }

    /// Convert to the game's RunConfig format
    pub fn to_run_config(&self) -> Result<RunConfig, String> {
        let config = RunConfig {
            reduced_capability: self.reduced_capability,
            starting_wave: self.starting_wave,
            starting_enemies: INITIAL_ENEMIES_PER_WAVE,
            ..RunConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}
