//! Player entity: vertical kinematics and the run/jump/duck/dive state machine
//!
//! ```text
//! Running --jump--> Jumping --land--> Running
//! Running --duck--> Ducking --release--> Running
//! Ducking --jump--> Jumping
//! Jumping --duck--> Diving  --land--> Running
//! any     --hit---> Dead (terminal)
//! ```
//!
//! Vertical offset is measured from the ground line: 0 is grounded, negative is
//! airborne. It never goes positive.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::tick::TickInput;
use crate::config::GameConfig;
use crate::consts::*;

/// Discrete player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Running,
    Jumping,
    Ducking,
    Diving,
    Dead,
}

impl PlayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerState::Running => "running",
            PlayerState::Jumping => "jumping",
            PlayerState::Ducking => "ducking",
            PlayerState::Diving => "diving",
            PlayerState::Dead => "dead",
        }
    }
}

/// The runner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Offset from the ground line (0 = grounded, negative = airborne)
    pub offset: f32,
    /// Vertical velocity (negative = upward)
    pub velocity: f32,
    pub state: PlayerState,
    /// Ticks lived; drives sprite-frame selection only
    pub anim_ticks: u64,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        matches!(self.state, PlayerState::Running | PlayerState::Ducking)
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        matches!(self.state, PlayerState::Jumping | PlayerState::Diving)
    }

    /// Apply this tick's control signal to the state machine
    pub fn apply_control(&mut self, input: &TickInput, config: &GameConfig) {
        match self.state {
            PlayerState::Dead => {}
            PlayerState::Running | PlayerState::Ducking if input.jump => {
                self.velocity = config.jump_impulse;
                self.state = PlayerState::Jumping;
            }
            PlayerState::Running if input.duck => {
                self.state = PlayerState::Ducking;
            }
            PlayerState::Ducking if !input.duck => {
                self.state = PlayerState::Running;
            }
            PlayerState::Jumping if input.duck => {
                // Cancel any remaining ascent; gravity takes over from rest
                self.velocity = self.velocity.max(0.0);
                self.state = PlayerState::Diving;
            }
            // No double jump, and diving never returns to jumping
            _ => {}
        }
    }

    /// Advance vertical physics by one tick
    pub fn integrate(&mut self, config: &GameConfig, time_scale: f32) {
        let gravity = match self.state {
            PlayerState::Dead => return,
            PlayerState::Running | PlayerState::Ducking => {
                self.offset = 0.0;
                self.velocity = 0.0;
                self.anim_ticks += 1;
                return;
            }
            PlayerState::Jumping => config.gravity,
            PlayerState::Diving => config.gravity * config.dive_gravity_multiplier,
        };

        self.velocity += gravity * time_scale;
        self.offset += self.velocity * time_scale * config.integration_factor;

        // Only a descending player lands; a jump on a zero-length frame keeps
        // its upward velocity for the next tick
        if self.offset >= 0.0 && self.velocity > 0.0 {
            self.offset = 0.0;
            self.velocity = 0.0;
            self.state = PlayerState::Running;
        }
        self.anim_ticks += 1;
    }

    /// Mark the player dead. Returns false if already dead.
    pub fn kill(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.state = PlayerState::Dead;
        true
    }

    /// Sprite height for the current state
    pub fn sprite_height(&self) -> f32 {
        if self.state == PlayerState::Ducking {
            PLAYER_DUCK_HEIGHT
        } else {
            PLAYER_HEIGHT
        }
    }

    /// Full sprite bounds in world space
    pub fn sprite_rect(&self, config: &GameConfig) -> Rect {
        let height = self.sprite_height();
        let top = config.ground_y() - height + self.offset;
        Rect::new(PLAYER_X, top, PLAYER_WIDTH, height)
    }

    /// Collision hitbox (sprite bounds inset by a fixed margin)
    pub fn hitbox(&self, config: &GameConfig) -> Rect {
        self.sprite_rect(config)
            .inset(PLAYER_INSET_X, PLAYER_INSET_Y)
    }

    /// Which of the two alternating sprite frames to show
    pub fn sprite_frame(&self) -> u8 {
        animation_frame(self.anim_ticks)
    }
}

/// Two-frame animation index for a tick counter
#[inline]
pub fn animation_frame(ticks: u64) -> u8 {
    ((ticks % ANIMATION_CYCLE_TICKS) / (ANIMATION_CYCLE_TICKS / 2)) as u8
}
