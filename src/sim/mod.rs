//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time enters only as an explicit per-tick scale
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod obstacles;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{Rect, collides, collides_any};
pub use obstacles::{Obstacle, ObstacleKind, Spawner, advance_obstacles};
pub use player::{Player, PlayerState, animation_frame};
pub use score::{ScoreUpdate, award_tick};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, TickReport, tick};
