//! Dino Runner - A side-scrolling runner with a deterministic simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, obstacles, collisions, scoring)
//! - `session`: Frame-driven session lifecycle around the simulation
//! - `control`: Keyboard/AI control signals and edge latching
//! - `ai`: Decision service client and local fallback heuristic
//! - `renderer`: Scene description and (web) canvas backend
//! - `platform`: Browser/native platform abstraction

pub mod ai;
pub mod assets;
pub mod config;
pub mod control;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, DecisionError};
pub use highscores::HighScores;
pub use session::{Session, SessionListener};

/// Fixed world geometry (not configurable; sprites are drawn to these sizes)
pub mod consts {
    /// Reference update rate the per-tick physics constants are tuned for
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Milliseconds per reference frame
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / REFERENCE_FPS;

    /// Player sprite box
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_DUCK_HEIGHT: f32 = 30.0;
    /// Height of the track band below the ground line
    pub const GROUND_OFFSET_FROM_BOTTOM: f32 = 30.0;

    /// Player hitbox inset (horizontal / vertical, per side)
    pub const PLAYER_INSET_X: f32 = 10.0;
    pub const PLAYER_INSET_Y: f32 = 5.0;
    /// Obstacle hitbox inset (per side)
    pub const OBSTACLE_INSET: f32 = 5.0;

    /// Longest scroll distance covered by one collision sub-step. Must stay
    /// below the narrowest overlap window (player hitbox width plus the
    /// narrowest obstacle hitbox width, 60 px).
    pub const MAX_STEP_DISTANCE: f32 = 30.0;

    /// Track texture period for ground scrolling
    pub const GROUND_TEXTURE_WIDTH: f32 = 100.0;

    /// Sprite-frame period: two frames alternate every half cycle
    pub const ANIMATION_CYCLE_TICKS: u64 = 20;
}
