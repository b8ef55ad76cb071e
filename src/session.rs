//! Game session
//!
//! Owns one `GameState` and drives it from frame callbacks. Frames come from
//! a `FrameScheduler` (requestAnimationFrame in the browser); the session
//! keeps at most one frame pending and cancels it before any reset, so a late
//! callback can never tick a fresh state.

use crate::ai::Snapshot;
use crate::config::GameConfig;
use crate::control::{Action, ControlLatch};
use crate::error::ConfigError;
use crate::highscores::HighScores;
use crate::platform;
use crate::sim::{FrameClock, GameEvent, GamePhase, GameState, TickReport, tick};

/// Identifies one scheduled frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Source of frame callbacks
///
/// `schedule` arranges for exactly one future call to `Session::on_frame`
/// with the returned handle; `cancel` guarantees it will not arrive.
pub trait FrameScheduler {
    fn schedule(&mut self) -> FrameHandle;
    fn cancel(&mut self, handle: FrameHandle);
}

/// Outward lifecycle signals, each fired at most once per tick
pub trait SessionListener {
    fn on_score_change(&mut self, _score: u64) {}
    fn on_speed_change(&mut self, _speed: f32) {}
    fn on_game_over(&mut self, _final_score: u64, _new_best: bool) {}
}

pub struct Session<S: FrameScheduler> {
    config: GameConfig,
    state: GameState,
    clock: FrameClock,
    latch: ControlLatch,
    scheduler: S,
    pending: Option<FrameHandle>,
    high_scores: HighScores,
    listeners: Vec<Box<dyn SessionListener>>,
}

impl<S: FrameScheduler> Session<S> {
    /// Create a session; the config is validated once here and trusted afterwards
    pub fn new(
        config: GameConfig,
        seed: u64,
        scheduler: S,
        high_scores: HighScores,
    ) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected game config: {}", e);
            return Err(e);
        }
        let state = GameState::new(seed, &config);
        Ok(Self {
            config,
            state,
            clock: FrameClock::new(),
            latch: ControlLatch::new(),
            scheduler,
            pending: None,
            high_scores,
            listeners: Vec::new(),
        })
    }

    pub fn add_listener(&mut self, listener: Box<dyn SessionListener>) {
        self.listeners.push(listener);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Read-only view of the live state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Decision snapshot of the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, &self.config)
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// A frame callback is outstanding
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin scheduling frames for a fresh session
    pub fn start(&mut self, now_ms: f64) {
        if self.pending.is_some() || self.state.phase != GamePhase::Ready {
            return;
        }
        log::info!("Session started (seed {})", self.state.seed);
        self.clock.reset(now_ms);
        self.latch.reset();
        self.schedule();
    }

    /// Stop ticking and mark the run paused. Returns false if nothing changed.
    pub fn pause(&mut self) -> bool {
        if !matches!(self.state.phase, GamePhase::Ready | GamePhase::Playing) {
            return false;
        }
        self.cancel_pending();
        self.state.phase = GamePhase::Paused;
        log::info!("Paused at score {}", self.state.score);
        true
    }

    /// Continue a paused run. Returns false if it was not paused.
    pub fn resume(&mut self, now_ms: f64) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Playing;
        self.clock.reset(now_ms);
        self.latch.reset();
        self.schedule();
        log::info!("Resumed");
        true
    }

    pub fn toggle_pause(&mut self, now_ms: f64) {
        if self.state.phase == GamePhase::Paused {
            self.resume(now_ms);
        } else {
            self.pause();
        }
    }

    /// Cancel any pending frame without touching the state
    pub fn stop(&mut self) {
        if self.cancel_pending() {
            log::info!("Session stopped at score {}", self.state.score);
        }
        self.clock.clear();
    }

    /// Replace the run with a fresh one and start it
    pub fn restart(&mut self, seed: u64, now_ms: f64) {
        // Cancel first: the old frame must not land on the new state
        self.cancel_pending();
        self.state = GameState::new(seed, &self.config);
        log::info!("Session restarted (seed {})", seed);
        self.clock.reset(now_ms);
        self.latch.reset();
        self.schedule();
    }

    /// Frame callback: run one tick with this frame's control action
    ///
    /// Callbacks for handles that are no longer pending are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: f64, action: Action) -> Option<TickReport> {
        if self.pending != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;

        let time_scale = self.clock.time_scale(now_ms, self.config.max_time_scale);
        let input = self.latch.sample(action);
        let report = tick(&mut self.state, &self.config, &input, time_scale);
        self.dispatch(&report);

        if self.state.is_playing() {
            self.schedule();
        }
        Some(report)
    }

    fn dispatch(&mut self, report: &TickReport) {
        for event in &report.events {
            match *event {
                GameEvent::ScoreChanged(score) => {
                    for listener in &mut self.listeners {
                        listener.on_score_change(score);
                    }
                }
                GameEvent::SpeedChanged(speed) => {
                    for listener in &mut self.listeners {
                        listener.on_speed_change(speed);
                    }
                }
                GameEvent::GameOver { final_score } => {
                    let new_best = self.record_high_score(final_score);
                    for listener in &mut self.listeners {
                        listener.on_game_over(final_score, new_best);
                    }
                }
            }
        }
    }

    /// Returns true if the score tops the board
    fn record_high_score(&mut self, final_score: u64) -> bool {
        log::info!("Game over, final score {}", final_score);
        let rank = self
            .high_scores
            .add_score(final_score, self.state.speed, platform::timestamp_ms());
        match rank {
            Some(rank) => {
                if rank == 1 {
                    log::info!("New high score: {}", final_score);
                }
                self.high_scores.save();
                rank == 1
            }
            None => false,
        }
    }

    fn schedule(&mut self) {
        self.pending = Some(self.scheduler.schedule());
    }

    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }
}
