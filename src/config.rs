//! Simulation tuning values
//!
//! Loaded from JSON so balance can change without a rebuild. Every field has
//! a default taken from the shipped game, so a partial file is fine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Data-driven tuning for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Run seed for reproducibility
    pub seed: u64,

    // === Playfield ===
    /// Playable columns (leftmost is 0, rightmost is `columns - 1`)
    pub columns: u16,
    /// Y the player is clamped to while the world scrolls instead
    pub scroll_threshold: i32,
    /// Stream a new section when this many rows or fewer are buffered
    pub low_water_rows: usize,

    // === Player movement (pixels per tick) ===
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Extra gravity while `down` is held
    pub drop_accel: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    /// Extra upward push per tick while `up` is held and still rising
    pub jump_hold_boost: f32,

    // === Bombs ===
    pub max_bombs: u32,
    /// Charge regained per tick
    pub bomb_regen: f32,
    pub bomb_fuse_ticks: u32,
    pub blast_ticks: u32,
    /// Blast reach from the bomb center, in pixels
    pub blast_radius: i32,

    // === Hazards ===
    /// Base spike chance per open face, per mille
    pub spike_base_per_mille: f32,
    /// Scroll distance that adds one per mille of spike chance
    pub spike_difficulty_divisor: f32,

    // === Movers and pickups ===
    /// Spawned rows deeper than this may carry butterflies or pickups
    pub mover_spawn_depth: i32,
    pub butterfly_base_per_mille: f32,
    pub pickup_per_mille: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,

            columns: 10,
            scroll_threshold: 200,
            low_water_rows: 16,

            gravity: 0.35,
            max_fall_speed: 8.0,
            drop_accel: 0.35,
            run_speed: 2.0,
            jump_speed: 4.0,
            jump_hold_boost: 0.2,

            max_bombs: 3,
            bomb_regen: 0.003,
            bomb_fuse_ticks: 60,
            blast_ticks: 15,
            blast_radius: 30,

            spike_base_per_mille: 10.0,
            spike_difficulty_divisor: 30.0,

            mover_spawn_depth: 300,
            butterfly_base_per_mille: 100.0,
            pickup_per_mille: 15.0,
        }
    }
}

impl SimConfig {
    /// Default tuning with a specific seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parse and validate tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 {
            return Err(ConfigError::Invalid {
                field: "columns",
                reason: format!("need at least 2 columns, got {}", self.columns),
            });
        }
        if self.scroll_threshold <= 0 {
            return Err(ConfigError::Invalid {
                field: "scroll_threshold",
                reason: format!("must be positive, got {}", self.scroll_threshold),
            });
        }
        if self.spike_difficulty_divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "spike_difficulty_divisor",
                reason: format!("must be positive, got {}", self.spike_difficulty_divisor),
            });
        }
        if self.max_fall_speed <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_fall_speed",
                reason: format!("must be positive, got {}", self.max_fall_speed),
            });
        }
        Ok(())
    }

    /// Index of the rightmost playable column
    #[inline]
    pub fn last_column(&self) -> i32 {
        self.columns as i32 - 1
    }

    /// Playfield width in pixels
    #[inline]
    pub fn field_width(&self) -> i32 {
        self.columns as i32 * crate::consts::TILE
    }
}
