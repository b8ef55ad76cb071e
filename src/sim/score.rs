//! Score accumulation and speed ramp
//!
//! One point per living tick. Each time the score reaches a multiple of the
//! milestone interval the speed steps up, clamped to the configured maximum.

use crate::config::GameConfig;

/// Result of awarding one tick of score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreUpdate {
    pub score: u64,
    /// New speed if it changed this tick
    pub new_speed: Option<f32>,
}

/// Award the point for a survived tick and apply any milestone speed-up
pub fn award_tick(score: &mut u64, speed: &mut f32, config: &GameConfig) -> ScoreUpdate {
    *score += 1;

    let mut new_speed = None;
    if *score % config.score_milestone == 0 {
        let ramped = (*speed + config.speed_increment).min(config.max_speed);
        if ramped > *speed {
            *speed = ramped;
            new_speed = Some(ramped);
        }
    }

    ScoreUpdate {
        score: *score,
        new_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ramp_config() -> GameConfig {
        GameConfig {
            base_speed: 6.0,
            max_speed: 8.0,
            speed_increment: 0.5,
            score_milestone: 100,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_one_point_per_tick() {
        let config = ramp_config();
        let mut score = 0;
        let mut speed = config.base_speed;
        for expected in 1..=50 {
            let update = award_tick(&mut score, &mut speed, &config);
            assert_eq!(update.score, expected);
            assert_eq!(update.new_speed, None);
        }
    }

    #[test]
    fn test_speed_steps_at_milestone() {
        let config = ramp_config();
        let mut score = 99;
        let mut speed = config.base_speed;
        let update = award_tick(&mut score, &mut speed, &config);
        assert_eq!(update.score, 100);
        assert_eq!(update.new_speed, Some(6.5));
        assert_eq!(speed, 6.5);

        let update = award_tick(&mut score, &mut speed, &config);
        assert_eq!(update.new_speed, None);
    }

    #[test]
    fn test_speed_clamped_and_silent_at_cap() {
        let config = ramp_config();
        let mut score = 99;
        let mut speed = 7.8;
        let update = award_tick(&mut score, &mut speed, &config);
        assert_eq!(update.new_speed, Some(8.0));

        // Already at the cap: no further change is reported
        score = 199;
        let update = award_tick(&mut score, &mut speed, &config);
        assert_eq!(update.new_speed, None);
        assert_eq!(speed, 8.0);
    }

    #[test]
    fn test_arcade_milestone() {
        let config = GameConfig::arcade();
        let mut score = 79;
        let mut speed = config.base_speed;
        let update = award_tick(&mut score, &mut speed, &config);
        assert!((update.new_speed.unwrap() - 12.7).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_speed_bounded_and_monotonic(
            ticks in 1usize..20_000,
            increment in 0.0f32..5.0,
            milestone in 1u64..200,
        ) {
            let config = GameConfig {
                speed_increment: increment,
                score_milestone: milestone,
                ..GameConfig::default()
            };
            let mut score = 0;
            let mut speed = config.base_speed;
            for _ in 0..ticks {
                let before = speed;
                let prev_score = score;
                award_tick(&mut score, &mut speed, &config);
                prop_assert_eq!(score, prev_score + 1);
                prop_assert!(speed >= before);
                prop_assert!(speed <= config.max_speed);
            }
        }
    }
}
