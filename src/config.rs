//! Game configuration
//!
//! Every tunable constant of the simulation lives here. A config is validated
//! once when a session is created; the tick loop trusts it afterwards.
//! Persisted separately from high scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable simulation constants (all values are per reference frame at 60 Hz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Player physics ===
    /// Downward acceleration added to vertical velocity each tick
    pub gravity: f32,
    /// Vertical velocity set on jump (negative = upward)
    pub jump_impulse: f32,
    /// Scale applied to velocity when integrating position
    pub integration_factor: f32,
    /// Gravity multiplier while diving (forced fast-fall)
    pub dive_gravity_multiplier: f32,

    // === Speed & score ===
    /// Initial horizontal scroll speed
    pub base_speed: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Speed added at each score milestone
    pub speed_increment: f32,
    /// Score interval between speed increments
    pub score_milestone: u64,

    // === Obstacles ===
    /// Hard minimum scroll distance between consecutive spawns
    pub min_obstacle_spacing: f32,
    /// Per-tick spawn probability once the spacing gate is open
    pub spawn_probability: f32,
    /// Per-tick probability of seeding an obstacle into an empty world
    pub first_obstacle_probability: f32,
    /// Probability that a spawned obstacle is flying
    pub flying_probability: f32,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,

    // === Clock ===
    /// Largest time scale a single tick may apply after a long pause
    pub max_time_scale: f32,

    // === AI control ===
    /// Distance ahead of the player within which the fallback heuristic reacts
    /// (widened at high speed)
    pub ai_lookahead: f32,
    /// Decisions older than this many ticks are ignored
    pub decision_max_age_ticks: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            jump_impulse: -12.0,
            integration_factor: 1.0,
            dive_gravity_multiplier: 3.0,

            base_speed: 6.0,
            max_speed: 12.0,
            speed_increment: 0.001,
            score_milestone: 100,

            min_obstacle_spacing: 200.0,
            spawn_probability: 0.02,
            first_obstacle_probability: 0.01,
            flying_probability: 0.3,

            world_width: 800.0,
            world_height: 300.0,

            max_time_scale: 3.0,

            ai_lookahead: 100.0,
            decision_max_age_ticks: 6,
        }
    }
}

impl GameConfig {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "dino_runner_config";

    /// Faster arcade variant: starts quick, ramps every 80 points
    pub fn arcade() -> Self {
        Self {
            integration_factor: 1.2,
            base_speed: 12.0,
            max_speed: 25.0,
            speed_increment: 0.7,
            score_milestone: 80,
            ..Self::default()
        }
    }

    /// Parse a config from JSON (missing fields take default values)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Ground line y (feet of a grounded player)
    #[inline]
    pub fn ground_y(&self) -> f32 {
        self.world_height - crate::consts::GROUND_OFFSET_FROM_BOTTOM
    }

    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("gravity", self.gravity),
            ("integration_factor", self.integration_factor),
            ("dive_gravity_multiplier", self.dive_gravity_multiplier),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("max_time_scale", self.max_time_scale),
        ];
        for (field, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("speed_increment", self.speed_increment),
            ("min_obstacle_spacing", self.min_obstacle_spacing),
            ("ai_lookahead", self.ai_lookahead),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        let probabilities = [
            ("spawn_probability", self.spawn_probability),
            ("first_obstacle_probability", self.first_obstacle_probability),
            ("flying_probability", self.flying_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        if !(self.jump_impulse < 0.0) {
            return Err(ConfigError::JumpDirection(self.jump_impulse));
        }
        if self.max_speed < self.base_speed {
            return Err(ConfigError::SpeedBounds {
                base: self.base_speed,
                max: self.max_speed,
            });
        }
        if self.min_obstacle_spacing > self.world_width {
            return Err(ConfigError::SpacingExceedsWorld {
                spacing: self.min_obstacle_spacing,
                width: self.world_width,
            });
        }
        if self.score_milestone == 0 {
            return Err(ConfigError::ZeroInterval("score_milestone"));
        }
        Ok(())
    }

    /// Load config from LocalStorage (WASM only), falling back to defaults
    pub fn load() -> Self {
        match crate::platform::load_json::<Self>(Self::STORAGE_KEY) {
            Some(config) => match config.validate() {
                Ok(()) => {
                    log::info!("Loaded config from LocalStorage");
                    config
                }
                Err(e) => {
                    log::warn!("Stored config rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default config");
                Self::default()
            }
        }
    }

    /// Save config to LocalStorage (no-op on native)
    pub fn save(&self) {
        crate::platform::save_json(Self::STORAGE_KEY, self);
    }
}
