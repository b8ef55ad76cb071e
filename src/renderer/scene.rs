//! Scene description
//!
//! Turns a `GameState` into a flat list of draw commands. Pure and
//! platform-agnostic; the canvas backend only executes the list.

use glam::Vec2;

use crate::assets::{AssetReport, SpriteId};
use crate::config::GameConfig;
use crate::consts::GROUND_TEXTURE_WIDTH;
use crate::sim::{GamePhase, GameState, ObstacleKind, PlayerState, Rect, animation_frame};

pub const BACKGROUND: &str = "#f7f7f7";
pub const INK: &str = "#535353";
const CACTUS: &str = "#2e7d32";
const BIRD: &str = "#6d4c41";

/// Track sprite height, centered on the ground line
const TRACK_HEIGHT: f32 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { rect: Rect, color: &'static str },
    Sprite { id: SpriteId, rect: Rect },
    Text { text: String, pos: Vec2, size: f32, align: TextAlign },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

/// Sprite if it loaded, otherwise a flat placeholder of the same bounds
fn sprite_or_fill(
    assets: Option<&AssetReport>,
    id: SpriteId,
    rect: Rect,
    color: &'static str,
) -> DrawCommand {
    match assets {
        Some(report) if report.is_loaded(id) => DrawCommand::Sprite { id, rect },
        _ => DrawCommand::Fill { rect, color },
    }
}

fn player_sprite(state: PlayerState, frame: u8) -> SpriteId {
    match (state, frame) {
        (PlayerState::Running, 0) => SpriteId::DinoRun1,
        (PlayerState::Running, _) => SpriteId::DinoRun2,
        (PlayerState::Ducking, 0) => SpriteId::DinoDuck1,
        (PlayerState::Ducking, _) => SpriteId::DinoDuck2,
        (PlayerState::Jumping | PlayerState::Diving, _) => SpriteId::DinoJump,
        (PlayerState::Dead, _) => SpriteId::DinoDead,
    }
}

/// Build the draw list for one frame
///
/// `assets` is `None` while sprites are still loading.
pub fn build_scene(
    state: &GameState,
    config: &GameConfig,
    assets: Option<&AssetReport>,
    high_score: Option<u64>,
) -> Scene {
    let size = Vec2::new(config.world_width, config.world_height);
    let ground_y = config.ground_y();
    let mut commands = vec![DrawCommand::Fill {
        rect: Rect::new(0.0, 0.0, size.x, size.y),
        color: BACKGROUND,
    }];

    // Ground
    match assets {
        Some(report) if report.is_loaded(SpriteId::Track) => {
            let mut x = state.ground_x;
            while x < size.x {
                commands.push(DrawCommand::Sprite {
                    id: SpriteId::Track,
                    rect: Rect::new(
                        x,
                        ground_y - TRACK_HEIGHT / 2.0,
                        GROUND_TEXTURE_WIDTH,
                        TRACK_HEIGHT,
                    ),
                });
                x += GROUND_TEXTURE_WIDTH;
            }
        }
        _ => commands.push(DrawCommand::Fill {
            rect: Rect::new(0.0, ground_y - 1.0, size.x, 2.0),
            color: INK,
        }),
    }

    // Obstacles
    let bird = match animation_frame(state.elapsed_ticks) {
        0 => SpriteId::Bird1,
        _ => SpriteId::Bird2,
    };
    for obstacle in &state.obstacles {
        let rect = obstacle.rect(config);
        let (id, color) = match obstacle.kind {
            kind if kind.is_flying() => (bird, BIRD),
            ObstacleKind::GroundLow => (SpriteId::SmallCactus, CACTUS),
            _ => (SpriteId::LargeCactus, CACTUS),
        };
        commands.push(sprite_or_fill(assets, id, rect, color));
    }

    // Player
    let player = &state.player;
    commands.push(sprite_or_fill(
        assets,
        player_sprite(player.state, player.sprite_frame()),
        player.sprite_rect(config),
        INK,
    ));

    // Score line
    let score_text = match high_score {
        Some(hi) => format!("HI {:05}  {:05}", hi, state.score),
        None => format!("{:05}", state.score),
    };
    commands.push(DrawCommand::Text {
        text: score_text,
        pos: Vec2::new(size.x - 20.0, 30.0),
        size: 18.0,
        align: TextAlign::Right,
    });

    let banner = match state.phase {
        GamePhase::Ready => Some("PRESS SPACE TO START"),
        GamePhase::Paused => Some("PAUSED"),
        GamePhase::GameOver => Some("GAME OVER"),
        GamePhase::Playing => None,
    };
    if let Some(banner) = banner {
        commands.push(DrawCommand::Text {
            text: banner.to_string(),
            pos: Vec2::new(size.x / 2.0, size.y / 2.0 - 40.0),
            size: 24.0,
            align: TextAlign::Center,
        });
    }

    Scene { size, commands }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetBarrier;
    use crate::sim::Obstacle;

    fn all_loaded() -> AssetReport {
        let mut barrier = AssetBarrier::new(SpriteId::ALL);
        let mut report = None;
        for id in SpriteId::ALL {
            report = barrier.settle(id, true).or(report);
        }
        report.unwrap()
    }

    fn sprites(scene: &Scene) -> Vec<SpriteId> {
        scene
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Sprite { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_placeholders_while_loading() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::GroundLow, 300.0, 0.0));
        let scene = build_scene(&state, &config, None, None);
        assert!(sprites(&scene).is_empty());
        assert!(scene.commands.contains(&DrawCommand::Fill {
            rect: state.obstacles[0].rect(&config),
            color: CACTUS,
        }));
    }

    #[test]
    fn test_failed_sprite_falls_back() {
        let config = GameConfig::default();
        let state = GameState::new(1, &config);
        let mut report = all_loaded();
        report.loaded.remove(&SpriteId::DinoRun1);
        report.failed.push(SpriteId::DinoRun1);

        let scene = build_scene(&state, &config, Some(&report), None);
        assert!(!sprites(&scene).contains(&SpriteId::DinoRun1));
        assert!(scene.commands.contains(&DrawCommand::Fill {
            rect: state.player.sprite_rect(&config),
            color: INK,
        }));
    }

    #[test]
    fn test_track_tiles_cover_world() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state.ground_x = -30.0;
        let scene = build_scene(&state, &config, Some(&all_loaded()), None);
        let tiles = sprites(&scene)
            .into_iter()
            .filter(|id| *id == SpriteId::Track)
            .count();
        // -30, 70, ..., 770
        assert_eq!(tiles, 9);
    }

    #[test]
    fn test_player_sprite_by_state() {
        assert_eq!(player_sprite(PlayerState::Running, 0), SpriteId::DinoRun1);
        assert_eq!(player_sprite(PlayerState::Running, 1), SpriteId::DinoRun2);
        assert_eq!(player_sprite(PlayerState::Ducking, 1), SpriteId::DinoDuck2);
        assert_eq!(player_sprite(PlayerState::Diving, 0), SpriteId::DinoJump);
        assert_eq!(player_sprite(PlayerState::Dead, 1), SpriteId::DinoDead);
    }

    #[test]
    fn test_bird_flaps_every_ten_ticks() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::FlyingLow, 300.0, 0.0));
        state
            .obstacles
            .push(Obstacle::new(2, ObstacleKind::GroundHigh, 600.0, 0.0));
        let report = all_loaded();

        let frames: Vec<Vec<SpriteId>> = [0, 9, 10, 19, 20]
            .into_iter()
            .map(|ticks| {
                state.elapsed_ticks = ticks;
                sprites(&build_scene(&state, &config, Some(&report), None))
                    .into_iter()
                    .filter(|id| !matches!(id, SpriteId::Track))
                    .take(2)
                    .collect()
            })
            .collect();
        assert_eq!(frames[0], vec![SpriteId::Bird1, SpriteId::LargeCactus]);
        assert_eq!(frames[1], frames[0]);
        assert_eq!(frames[2], vec![SpriteId::Bird2, SpriteId::LargeCactus]);
        assert_eq!(frames[3], frames[2]);
        assert_eq!(frames[4], frames[0]);
    }

    #[test]
    fn test_banner_and_score() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state.phase = GamePhase::GameOver;
        state.score = 42;
        let scene = build_scene(&state, &config, None, Some(120));
        let texts: Vec<&str> = scene
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["HI 00120  00042", "GAME OVER"]);
    }
}
