//! Error types
//!
//! Collisions are not errors: a run ending is a normal state transition and is
//! reported through `GameEvent::GameOver`.

use thiserror::Error;

/// Rejected game configuration (checked once, before a session starts)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero, negative or NaN
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    /// A value that must be non-negative was negative or NaN
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    /// A per-tick probability outside [0, 1]
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    Probability { field: &'static str, value: f32 },

    /// Speed bounds are inverted
    #[error("max_speed ({max}) must be at least base_speed ({base})")]
    SpeedBounds { base: f32, max: f32 },

    /// Jump impulse must point upward (negative y)
    #[error("jump_impulse must be negative (upward), got {0}")]
    JumpDirection(f32),

    /// Obstacles could never satisfy the spacing gate inside the world
    #[error("min_obstacle_spacing ({spacing}) exceeds world_width ({width})")]
    SpacingExceedsWorld { spacing: f32, width: f32 },

    /// Integer setting that must be at least one
    #[error("{0} must be at least 1")]
    ZeroInterval(&'static str),

    /// Config could not be parsed
    #[error("Config parse error: {0}")]
    Parse(String),

    /// Config file could not be read
    #[error("Failed to read config {path}: {reason}")]
    Io { path: String, reason: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure to obtain an action from the decision service
///
/// Never fatal: callers fall back to the local heuristic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionError {
    /// Network/transport failure (connection refused, timeout, HTTP status)
    #[error("Decision transport error: {0}")]
    Transport(String),

    /// Service answered with something we could not interpret
    #[error("Malformed decision response: {0}")]
    Malformed(String),

    /// No service is configured or the worker has shut down
    #[error("Decision service unavailable")]
    Unavailable,
}

impl DecisionError {
    /// Creates a new transport error.
    #[must_use]
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Creates a new malformed-response error.
    #[must_use]
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::Malformed(msg.into())
    }
}
