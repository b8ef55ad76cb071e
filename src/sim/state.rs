//! Game state and core simulation types
//!
//! All state that must be captured for determinism lives here. A `GameState`
//! is owned by exactly one session and only mutated inside `tick`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles::{Obstacle, Spawner};
use super::player::Player;
use crate::config::GameConfig;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh state, waiting for the first frame
    #[default]
    Ready,
    /// Active gameplay
    Playing,
    /// Frames are not being scheduled
    Paused,
    /// Run ended (terminal until restart)
    GameOver,
}

/// Something observers care about, emitted at most once per kind per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged(u64),
    SpeedChanged(f32),
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Obstacle RNG, advanced only by the spawner
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub score: u64,
    /// Horizontal scroll speed, within [base_speed, max_speed]
    pub speed: f32,
    /// Ticks simulated this run
    pub elapsed_ticks: u64,
    pub player: Player,
    /// Live obstacles in spawn order (leftmost first)
    pub obstacles: Vec<Obstacle>,
    pub spawner: Spawner,
    /// Ground texture scroll, wraps at the texture width (cosmetic)
    pub ground_x: f32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, config: &GameConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            score: 0,
            speed: config.base_speed,
            elapsed_ticks: 0,
            player: Player::new(),
            obstacles: Vec::new(),
            spawner: Spawner::new(),
            ground_x: 0.0,
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Nearest obstacles whose trailing edge is still ahead of `x`, closest first
    pub fn obstacles_ahead_of(&self, x: f32) -> impl Iterator<Item = &Obstacle> {
        // Spawn order is also left-to-right order
        self.obstacles.iter().filter(move |o| o.x + o.width() > x)
    }
}
