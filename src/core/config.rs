//! Simulation configuration with documented constants
//!
//! All tunable thresholds live here and are passed by reference to the
//! systems that need them. There is no global instance.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::ConfigError;

/// Configuration for the simulation systems
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === TIMING ===
    /// Fixed ticks per second; each tick advances actors by `1 / tick_frequency`
    pub tick_frequency: f64,

    /// Upper bound on action steps (start/progress/complete cycles) one actor
    /// may take within a single update
    pub max_steps_per_update: usize,

    // === ENGAGEMENT ===
    /// Attack is legal while the attacker is strictly closer than this
    ///
    /// At 1.5 every one of the eight neighbours (diagonals are ~1.414 away)
    /// is in reach, but nothing two tiles away is.
    pub melee_range: f64,

    /// Interact is legal while the actor is strictly closer than this
    ///
    /// The default only admits the structure's own tile.
    pub interact_range: f64,

    // === NUMERICS ===
    /// Progress at or above `1 - progress_epsilon` completes an action
    pub progress_epsilon: f64,

    /// Hit points at or below this kill the actor
    pub hit_point_epsilon: f64,

    // === OBSERVERS ===
    /// Actor type spawned for each connecting observer
    pub player_type: String,

    /// Faction label given to observer actors
    pub player_faction: Option<String>,

    /// Largest accepted frame on the wire, in bytes
    pub max_frame_bytes: usize,

    // === PATHFINDING ===
    /// Cached paths kept before the cache starts over
    pub path_cache_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_frequency: 20.0,
            max_steps_per_update: 64,

            melee_range: 1.5,
            interact_range: 0.01,

            progress_epsilon: 1e-9,
            hit_point_epsilon: 1e-9,

            player_type: "player".to_string(),
            player_faction: Some("players".to_string()),
            max_frame_bytes: 1 << 20,

            path_cache_capacity: 4096,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Length of one tick in seconds
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_frequency
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_frequency > 0.0 && self.tick_frequency.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "tick_frequency must be positive and finite, got {}",
                self.tick_frequency
            )));
        }

        if self.max_steps_per_update == 0 {
            return Err(ConfigError::Invalid(
                "max_steps_per_update must be at least 1".into(),
            ));
        }

        if self.melee_range <= 0.0 || self.interact_range <= 0.0 {
            return Err(ConfigError::Invalid(
                "engagement ranges must be positive".into(),
            ));
        }

        if !(0.0..0.5).contains(&self.progress_epsilon) {
            return Err(ConfigError::Invalid(format!(
                "progress_epsilon ({}) must be in [0, 0.5)",
                self.progress_epsilon
            )));
        }

        if self.max_frame_bytes < 16 {
            return Err(ConfigError::Invalid("max_frame_bytes is too small".into()));
        }

        if self.path_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "path_cache_capacity must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
