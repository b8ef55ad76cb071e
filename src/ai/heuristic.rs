//! Local fallback policy
//!
//! Deterministic and dependency-free so it can always stand in for a remote
//! decision service. Looks only at the nearest obstacle ahead.

use super::snapshot::Snapshot;
use crate::control::Action;
use crate::sim::{ObstacleKind, PlayerState};

/// Ticks of warning a jump needs to be airborne before the obstacle arrives
const JUMP_LEAD_TICKS: f32 = 16.0;

/// Reaction distance: `lookahead`, widened at high speed to keep the lead time
pub fn reach(lookahead: f32, speed: f32) -> f32 {
    lookahead.max(speed * JUMP_LEAD_TICKS)
}

/// Pick an action from a snapshot
///
/// Within reach of the player: duck under a head-height bird; jump anything
/// else, but only from the ground. Otherwise do nothing.
pub fn heuristic_action(snapshot: &Snapshot, lookahead: f32) -> Action {
    if snapshot.game_over {
        return Action::None;
    }
    let Some(nearest) = snapshot.nearest() else {
        return Action::None;
    };
    if nearest.distance() > reach(lookahead, snapshot.speed) {
        return Action::None;
    }

    let grounded = matches!(
        snapshot.player.state,
        PlayerState::Running | PlayerState::Ducking
    );
    match nearest.kind {
        ObstacleKind::FlyingHigh => Action::Duck,
        _ if grounded => Action::Jump,
        _ => Action::None,
    }
}
