//! Simulation tick
//!
//! Core game loop step. Order matters:
//! 1. ground scroll (cosmetic)
//! 2. player control + physics
//! 3. obstacle advection and removal
//! 4. spawning
//! 5. collision against the updated player and obstacle set
//! 6. scoring (only if the player survived this tick)
//!
//! Steps 2 to 5 run in sub-steps of at most `MAX_STEP_DISTANCE` of scroll, so
//! a long frame at high speed still samples every overlap. Spawning happens
//! once, on the last sub-step.

use super::collision::collides_any;
use super::obstacles::advance_obstacles;
use super::score::award_tick;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::GameConfig;
use crate::consts::{GROUND_TEXTURE_WIDTH, MAX_STEP_DISTANCE};

/// Control signals for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump pulse (already edge-detected)
    pub jump: bool,
    /// Duck is held
    pub duck: bool,
}

/// Events produced by one tick (at most one of each kind)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn game_over(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score } => Some(*final_score),
            _ => None,
        })
    }
}

/// Advance the game state by one tick
///
/// `time_scale` is elapsed real time in reference frames (1.0 at 60 Hz),
/// already clamped by the caller's clock. Does nothing unless playing.
pub fn tick(
    state: &mut GameState,
    config: &GameConfig,
    input: &TickInput,
    time_scale: f32,
) -> TickReport {
    let mut report = TickReport::default();
    if state.phase == GamePhase::Ready {
        state.phase = GamePhase::Playing;
    }
    if !state.is_playing() || state.player.is_dead() {
        return report;
    }

    state.elapsed_ticks += 1;
    let dx = state.speed * time_scale;

    // Ground scroll
    state.ground_x = (state.ground_x - dx) % GROUND_TEXTURE_WIDTH;

    // Long frames are split so no obstacle can skip past the player
    let steps = sub_steps(dx);
    let step_dx = dx / steps as f32;
    let step_scale = time_scale / steps as f32;
    for step in 0..steps {
        // Jump is an edge: only the first sub-step sees it
        let control = TickInput {
            jump: input.jump && step == 0,
            duck: input.duck,
        };

        // Player
        state.player.apply_control(&control, config);
        state.player.integrate(config, step_scale);

        // Obstacles
        advance_obstacles(&mut state.obstacles, step_dx);
        state.spawner.add_scroll(step_dx);
        if step + 1 == steps {
            state
                .spawner
                .maybe_spawn(&mut state.obstacles, &mut state.rng, config);
        }

        // Collision
        let player_box = state.player.hitbox(config);
        let hitboxes: Vec<_> = state.obstacles.iter().map(|o| o.hitbox(config)).collect();
        if collides_any(&player_box, &hitboxes) {
            state.player.kill();
            state.phase = GamePhase::GameOver;
            log::debug!(
                "Collision at tick {} (score {})",
                state.elapsed_ticks,
                state.score
            );
            report.events.push(GameEvent::GameOver {
                final_score: state.score,
            });
            return report;
        }
    }

    // Score & speed
    let update = award_tick(&mut state.score, &mut state.speed, config);
    report.events.push(GameEvent::ScoreChanged(update.score));
    if let Some(speed) = update.new_speed {
        report.events.push(GameEvent::SpeedChanged(speed));
    }

    report
}

/// Number of collision sub-steps needed to scroll `dx`
fn sub_steps(dx: f32) -> u32 {
    (dx / MAX_STEP_DISTANCE).ceil().max(1.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::obstacles::{Obstacle, ObstacleKind};
    use crate::sim::player::PlayerState;
    use proptest::prelude::*;

    /// No random spawns; obstacles are placed by hand
    fn quiet_config() -> GameConfig {
        GameConfig {
            spawn_probability: 0.0,
            first_obstacle_probability: 0.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_first_tick_starts_play() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        let report = tick(&mut state, &config, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        assert_eq!(report.events, vec![GameEvent::ScoreChanged(1)]);
    }

    #[test]
    fn test_collision_scenario() {
        // Obstacle reaches the player's standing hitbox on tick 100.
        // Player hitbox spans x 60..100; a low bird's hitbox starts at x + 5,
        // so it overlaps once x < 95. Starting at 692 with speed 6:
        // tick 99 -> x = 98 (clear), tick 100 -> x = 92 (hit).
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::FlyingLow, 692.0, 0.0));

        let mut game_over_tick = None;
        for t in 1..=150u32 {
            let report = tick(&mut state, &config, &TickInput::default(), 1.0);
            if let Some(final_score) = report.game_over() {
                assert_eq!(final_score, 99);
                game_over_tick = Some(t);
            }
        }

        assert_eq!(game_over_tick, Some(100));
        assert!(state.is_game_over());
        assert!(!state.is_playing());
        assert_eq!(state.score, 99);
        assert_eq!(state.player.state, PlayerState::Dead);
        assert_eq!(state.elapsed_ticks, 100);
    }

    #[test]
    fn test_ducking_avoids_high_bird() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::FlyingHigh, 300.0, 0.0));
        let duck = TickInput {
            jump: false,
            duck: true,
        };
        for _ in 0..150 {
            tick(&mut state, &config, &duck, 1.0);
        }
        assert!(state.is_playing());
        assert_eq!(state.score, 150);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_jumping_clears_cactus() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::GroundHigh, 200.0, 0.0));

        // Obstacle hitbox (x+5 .. x+35) meets the player (60..100) when x < 95,
        // i.e. around tick 18; jump a few ticks earlier.
        for t in 0..120 {
            let input = TickInput {
                jump: t == 10,
                duck: false,
            };
            tick(&mut state, &config, &input, 1.0);
        }
        assert!(state.is_playing(), "died at score {}", state.score);
    }

    #[test]
    fn test_no_updates_after_game_over() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::GroundLow, 60.0, 0.0));
        let report = tick(&mut state, &config, &TickInput::default(), 1.0);
        assert_eq!(report.game_over(), Some(0));

        let frozen_x = state.obstacles[0].x;
        for _ in 0..10 {
            let report = tick(&mut state, &config, &TickInput::default(), 1.0);
            assert!(report.events.is_empty());
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.obstacles[0].x, frozen_x);
    }

    #[test]
    fn test_speed_change_event() {
        let config = GameConfig {
            speed_increment: 1.0,
            score_milestone: 10,
            ..quiet_config()
        };
        let mut state = GameState::new(1, &config);
        let mut speed_events = Vec::new();
        for _ in 0..30 {
            let report = tick(&mut state, &config, &TickInput::default(), 1.0);
            speed_events.extend(report.events.iter().filter_map(|e| match e {
                GameEvent::SpeedChanged(s) => Some(*s),
                _ => None,
            }));
        }
        assert_eq!(speed_events, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_ground_scroll_wraps() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        for _ in 0..100 {
            tick(&mut state, &config, &TickInput::default(), 1.0);
            assert!(state.ground_x > -GROUND_TEXTURE_WIDTH && state.ground_x <= 0.0);
        }
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let config = GameConfig::default();
        let mut state1 = GameState::new(99999, &config);
        let mut state2 = GameState::new(99999, &config);

        for t in 0..2000u32 {
            let input = TickInput {
                jump: t % 37 == 0,
                duck: t % 53 < 5,
            };
            tick(&mut state1, &config, &input, 1.0);
            tick(&mut state2, &config, &input, 1.0);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.player, state2.player);
    }

    #[test]
    fn test_long_frame_at_max_speed_still_collides() {
        let config = GameConfig {
            spawn_probability: 0.0,
            first_obstacle_probability: 0.0,
            ..GameConfig::arcade()
        };
        let mut state = GameState::new(1, &config);
        state.speed = config.max_speed;
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::GroundLow, 100.0, 0.0));

        // 75 px in one frame would carry x from 100 to 25, past the 35..95 overlap
        let report = tick(&mut state, &config, &TickInput::default(), config.max_time_scale);
        assert_eq!(report.game_over(), Some(0));
        assert_eq!(state.player.state, PlayerState::Dead);
    }

    #[test]
    fn test_step_fits_narrowest_overlap() {
        let player = crate::sim::player::Player::new();
        let config = GameConfig::default();
        let narrowest = ObstacleKind::ALL
            .iter()
            .map(|&k| Obstacle::new(0, k, 0.0, 0.0).hitbox(&config).size.x)
            .fold(f32::INFINITY, f32::min);
        assert!(MAX_STEP_DISTANCE < player.hitbox(&config).size.x + narrowest);

        assert_eq!(sub_steps(0.0), 1);
        assert_eq!(sub_steps(MAX_STEP_DISTANCE), 1);
        assert_eq!(sub_steps(75.0), 3);
    }

    #[test]
    fn test_jump_survives_zero_length_frame() {
        let config = quiet_config();
        let mut state = GameState::new(1, &config);
        let jump = TickInput {
            jump: true,
            duck: false,
        };
        tick(&mut state, &config, &jump, 0.0);
        assert_eq!(state.player.state, PlayerState::Jumping);

        tick(&mut state, &config, &TickInput::default(), 1.0);
        assert!(state.player.offset < 0.0);
    }

    proptest! {
        #[test]
        fn prop_standing_player_always_hit_at_arcade_speed(
            kind in prop::sample::select(ObstacleKind::ALL.to_vec()),
            start in 100.0f32..400.0,
            speed in 12.0f32..=25.0,
            time_scale in 0.5f32..=3.0,
        ) {
            let config = GameConfig {
                spawn_probability: 0.0,
                first_obstacle_probability: 0.0,
                ..GameConfig::arcade()
            };
            let mut state = GameState::new(7, &config);
            state.speed = speed.min(config.max_speed);
            state.obstacles.push(Obstacle::new(1, kind, start, 0.0));

            let mut hit = false;
            for _ in 0..500 {
                if tick(&mut state, &config, &TickInput::default(), time_scale).game_over().is_some() {
                    hit = true;
                    break;
                }
            }
            prop_assert!(hit, "{:?} passed a standing player", kind);
        }

        #[test]
        fn prop_score_and_speed_while_alive(seed in any::<u64>(), scales in proptest::collection::vec(0.0f32..3.0, 1..500)) {
            let config = GameConfig {
                speed_increment: 0.5,
                score_milestone: 20,
                ..GameConfig::default()
            };
            let mut state = GameState::new(seed, &config);
            for scale in scales {
                let score = state.score;
                let speed = state.speed;
                let report = tick(&mut state, &config, &TickInput::default(), scale);
                if report.game_over().is_some() {
                    prop_assert_eq!(state.score, score);
                    prop_assert!(state.is_game_over());
                    break;
                }
                prop_assert_eq!(state.score, score + 1);
                prop_assert!(state.speed >= speed);
                prop_assert!(state.speed <= config.max_speed);
            }
        }
    }
}
