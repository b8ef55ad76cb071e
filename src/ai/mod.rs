//! Automated control
//!
//! Snapshots of the game go to a decision source; actions come back through a
//! `DecisionSlot` that the tick loop samples without ever waiting on it.

pub mod heuristic;
pub mod service;
pub mod slot;
pub mod snapshot;
#[cfg(not(target_arch = "wasm32"))]
pub mod worker;

pub use heuristic::heuristic_action;
#[cfg(not(target_arch = "wasm32"))]
pub use service::HttpDecisionService;
pub use service::{
    DecisionResponse, DecisionService, DecisionSource, FailureLog, HeuristicService,
    decide_or_fallback, parse_decision,
};
pub use slot::DecisionSlot;
pub use snapshot::{ObstacleView, PlayerView, Snapshot};
#[cfg(not(target_arch = "wasm32"))]
pub use worker::DecisionWorker;
