//! Obstacles and the procedural spawner
//!
//! Spawning is gated by a hard minimum scroll distance since the previous
//! spawn; once the gate is open each tick rolls a small spawn probability, so
//! gaps are the minimum plus a memoryless random extra. An empty world also
//! rolls a separate seed probability whenever the gated roll did not spawn.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::config::GameConfig;
use crate::consts::OBSTACLE_INSET;

/// Obstacle types
///
/// Flying bands are named by altitude above the ground line: the low band
/// skims the ground and must be jumped, the high band flies at head height
/// and can be ducked under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Small cactus
    GroundLow,
    /// Large cactus
    GroundHigh,
    /// Bird just above the ground
    FlyingLow,
    /// Bird at head height
    FlyingHigh,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::GroundLow,
        ObstacleKind::GroundHigh,
        ObstacleKind::FlyingLow,
        ObstacleKind::FlyingHigh,
    ];

    /// Sprite size (width, height)
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::GroundLow => Vec2::new(30.0, 45.0),
            ObstacleKind::GroundHigh => Vec2::new(40.0, 60.0),
            ObstacleKind::FlyingLow | ObstacleKind::FlyingHigh => Vec2::new(60.0, 40.0),
        }
    }

    /// Gap between the ground line and the sprite's bottom edge
    pub fn altitude(self) -> f32 {
        match self {
            ObstacleKind::GroundLow | ObstacleKind::GroundHigh => 0.0,
            ObstacleKind::FlyingLow => 8.0,
            ObstacleKind::FlyingHigh => 35.0,
        }
    }

    #[inline]
    pub fn is_flying(self) -> bool {
        matches!(self, ObstacleKind::FlyingLow | ObstacleKind::FlyingHigh)
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Left edge in world space
    pub x: f32,
    /// Total scroll distance when this obstacle was introduced
    pub spawned_at: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, x: f32, spawned_at: f32) -> Self {
        Self {
            id,
            kind,
            x,
            spawned_at,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.kind.size().x
    }

    /// Top edge in world space
    pub fn top(&self, config: &GameConfig) -> f32 {
        config.ground_y() - self.kind.altitude() - self.kind.size().y
    }

    /// Full sprite bounds
    pub fn rect(&self, config: &GameConfig) -> Rect {
        let size = self.kind.size();
        Rect::new(self.x, self.top(config), size.x, size.y)
    }

    /// Collision hitbox
    pub fn hitbox(&self, config: &GameConfig) -> Rect {
        self.rect(config).inset(OBSTACLE_INSET, OBSTACLE_INSET)
    }

    /// Trailing edge has left the world
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x + self.width() < 0.0
    }
}

/// Move every obstacle left by `dx` and drop the ones that left the world
///
/// Relative order of survivors is preserved.
pub fn advance_obstacles(obstacles: &mut Vec<Obstacle>, dx: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.x -= dx;
    }
    obstacles.retain(|o| !o.is_off_screen());
}

/// Spawner bookkeeping (lives in `GameState`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Total distance scrolled this run
    pub scrolled: f32,
    /// `scrolled` at the most recent spawn
    pub last_spawn_at: Option<f32>,
    next_id: u32,
}

impl Spawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record scroll distance for this tick
    pub fn add_scroll(&mut self, dx: f32) {
        self.scrolled += dx;
    }

    /// Distance scrolled since the last spawn (None before the first one)
    pub fn distance_since_spawn(&self) -> Option<f32> {
        self.last_spawn_at.map(|at| self.scrolled - at)
    }

    /// Whether the spacing gate is open
    pub fn gate_open(&self, config: &GameConfig) -> bool {
        self.distance_since_spawn()
            .is_some_and(|d| d > config.min_obstacle_spacing)
    }

    /// Possibly introduce a new obstacle at the right edge of the world
    ///
    /// Returns the kind spawned, if any.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        obstacles: &mut Vec<Obstacle>,
        rng: &mut R,
        config: &GameConfig,
    ) -> Option<ObstacleKind> {
        let mut spawn =
            self.gate_open(config) && rng.random_bool(config.spawn_probability as f64);
        if !spawn && obstacles.is_empty() {
            // Independent seed roll; an empty world has nothing to space against
            spawn = rng.random_bool(config.first_obstacle_probability as f64);
        }
        if !spawn {
            return None;
        }

        let kind = pick_kind(rng, config);
        self.next_id += 1;
        obstacles.push(Obstacle::new(
            self.next_id,
            kind,
            config.world_width,
            self.scrolled,
        ));
        self.last_spawn_at = Some(self.scrolled);
        Some(kind)
    }
}

/// Independent draws: flying vs ground, then one of two sub-types uniformly
fn pick_kind<R: Rng>(rng: &mut R, config: &GameConfig) -> ObstacleKind {
    let flying = rng.random_bool(config.flying_probability as f64);
    let first = rng.random_bool(0.5);
    match (flying, first) {
        (true, true) => ObstacleKind::FlyingLow,
        (true, false) => ObstacleKind::FlyingHigh,
        (false, true) => ObstacleKind::GroundLow,
        (false, false) => ObstacleKind::GroundHigh,
    }
}
