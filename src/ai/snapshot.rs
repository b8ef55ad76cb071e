//! Decision snapshot
//!
//! The read-only view of a game that a decision source sees. Serialized as
//! the request body for a remote decision service.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::consts::PLAYER_X;
use crate::sim::{GameState, ObstacleKind, PlayerState};

/// Obstacles reported per snapshot, nearest first
pub const MAX_SNAPSHOT_OBSTACLES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub state: PlayerState,
    /// Vertical offset from the ground line (negative is up)
    pub offset: f32,
    pub velocity: f32,
    pub ducking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ObstacleView {
    /// Horizontal distance from the player's left edge to this obstacle
    #[inline]
    pub fn distance(&self) -> f32 {
        self.x - PLAYER_X
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick the snapshot was taken at; not part of the service contract
    #[serde(default, skip_serializing)]
    pub tick: u64,
    pub score: u64,
    pub speed: f32,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub game_over: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState, config: &GameConfig) -> Self {
        let obstacles = state
            .obstacles_ahead_of(PLAYER_X)
            .take(MAX_SNAPSHOT_OBSTACLES)
            .map(|o| {
                let rect = o.rect(config);
                ObstacleView {
                    kind: o.kind,
                    x: rect.left(),
                    y: rect.top(),
                    width: rect.size.x,
                    height: rect.size.y,
                }
            })
            .collect();

        Self {
            tick: state.elapsed_ticks,
            score: state.score,
            speed: state.speed,
            player: PlayerView {
                state: state.player.state,
                offset: state.player.offset,
                velocity: state.player.velocity,
                ducking: state.player.state == PlayerState::Ducking,
            },
            obstacles,
            game_over: state.is_game_over(),
        }
    }

    /// Closest obstacle still ahead of the player
    pub fn nearest(&self) -> Option<&ObstacleView> {
        self.obstacles.first()
    }
}
