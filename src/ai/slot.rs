//! Latest-decision mailbox
//!
//! Decisions arrive asynchronously; the tick loop only ever reads the most
//! recent one. Anything too old (or nothing at all) reads as `Action::None`.

use crate::control::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delivered {
    action: Action,
    /// Tick of the snapshot the decision was made for
    tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct DecisionSlot {
    latest: Option<Delivered>,
}

impl DecisionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a decision; out-of-order arrivals older than the current one are dropped
    pub fn deliver(&mut self, action: Action, tick: u64) {
        if self.latest.is_some_and(|d| d.tick > tick) {
            return;
        }
        self.latest = Some(Delivered { action, tick });
    }

    /// Action to apply at `now_tick`
    pub fn action_at(&self, now_tick: u64, max_age_ticks: u64) -> Action {
        match self.latest {
            Some(d) if now_tick.saturating_sub(d.tick) <= max_age_ticks => d.action,
            _ => Action::None,
        }
    }

    pub fn clear(&mut self) {
        self.latest = None;
    }
}
