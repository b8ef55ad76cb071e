//! Background decision worker (native)
//!
//! Runs a blocking `DecisionService` on its own thread. The request queue
//! holds a single snapshot: while a request is in flight, newer snapshots are
//! simply skipped, so a slow service never builds a backlog.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::JoinHandle;

use super::service::{DecisionService, FailureLog, decide_or_fallback};
use super::slot::DecisionSlot;
use super::snapshot::Snapshot;
use crate::control::Action;

pub struct DecisionWorker {
    requests: Option<SyncSender<Snapshot>>,
    results: Receiver<(u64, Action)>,
    handle: Option<JoinHandle<()>>,
}

impl DecisionWorker {
    /// Spawn the worker thread; failures fall back to the heuristic with `lookahead`
    pub fn spawn(mut service: Box<dyn DecisionService + Send>, lookahead: f32) -> Self {
        let (request_tx, request_rx) = mpsc::sync_channel::<Snapshot>(1);
        let (result_tx, result_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let mut failures = FailureLog::new();
            for snapshot in request_rx {
                let (action, _) =
                    decide_or_fallback(service.as_mut(), &snapshot, lookahead, &mut failures);
                if result_tx.send((snapshot.tick, action)).is_err() {
                    break;
                }
            }
            log::debug!("Decision worker exiting");
        });

        Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
        }
    }

    /// Offer a snapshot; returns false if the worker is busy or gone
    pub fn submit(&self, snapshot: Snapshot) -> bool {
        let Some(requests) = &self.requests else {
            return false;
        };
        match requests.try_send(snapshot) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                log::warn!("Decision worker disconnected");
                false
            }
        }
    }

    /// Move every finished decision into `slot`
    pub fn drain_into(&self, slot: &mut DecisionSlot) -> usize {
        let mut delivered = 0;
        while let Ok((tick, action)) = self.results.try_recv() {
            slot.deliver(action, tick);
            delivered += 1;
        }
        delivered
    }
}

impl Drop for DecisionWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Decision worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::error::DecisionError;
    use crate::sim::{GameState, Obstacle, ObstacleKind};
    use std::time::{Duration, Instant};

    struct Unreachable;

    impl DecisionService for Unreachable {
        fn decide(&mut self, _snapshot: &Snapshot) -> Result<Action, DecisionError> {
            Err(DecisionError::transport("connection refused"))
        }

        fn name(&self) -> &str {
            "unreachable"
        }
    }

    fn wait_for_decision(worker: &DecisionWorker, slot: &mut DecisionSlot) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while worker.drain_into(slot) == 0 {
            assert!(Instant::now() < deadline, "worker never answered");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_unreachable_service_uses_heuristic() {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::FlyingHigh, 100.0, 0.0));
        state.elapsed_ticks = 42;

        let worker = DecisionWorker::spawn(Box::new(Unreachable), config.ai_lookahead);
        assert!(worker.submit(Snapshot::capture(&state, &config)));

        let mut slot = DecisionSlot::new();
        wait_for_decision(&worker, &mut slot);
        assert_eq!(slot.action_at(42, 6), Action::Duck);
        assert_eq!(slot.action_at(100, 6), Action::None);
    }
}
