//! Frame clock
//!
//! Converts wall-clock frame callbacks into a per-tick time scale relative to
//! a 60 Hz reference frame. The scale is clamped so a long stall (tab hidden,
//! debugger pause) cannot move anything far enough to tunnel through an
//! obstacle in a single tick.

use serde::{Deserialize, Serialize};

use crate::consts::REFERENCE_FRAME_MS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor the clock (on start/resume) so the first tick measures from here
    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Forget the anchor; the next tick runs at scale 1.0
    pub fn clear(&mut self) {
        self.last_ms = None;
    }

    /// Time scale for a frame arriving at `now_ms`, in `[0, max_scale]`
    pub fn time_scale(&mut self, now_ms: f64, max_scale: f32) -> f32 {
        let scale = match self.last_ms {
            Some(last) => ((now_ms - last) as f32 / REFERENCE_FRAME_MS).max(0.0),
            None => 1.0,
        };
        self.last_ms = Some(now_ms);
        scale.min(max_scale)
    }
}
