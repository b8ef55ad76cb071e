//! Decision services
//!
//! A `DecisionService` maps a snapshot to an action. Remote services can
//! fail; `decide_or_fallback` turns any failure into the local heuristic so
//! the game never stalls on the network.

use serde::{Deserialize, Serialize};

use super::heuristic::heuristic_action;
use super::snapshot::Snapshot;
use crate::control::Action;
use crate::error::DecisionError;

/// Path appended to the service base URL
pub const DECISION_PATH: &str = "/ai-decision";

/// Response body of the decision endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub action: String,
    #[serde(default)]
    pub confidence: f32,
}

impl DecisionResponse {
    /// Validate the action name
    pub fn into_action(self) -> Result<Action, DecisionError> {
        Action::from_str(&self.action)
            .ok_or_else(|| DecisionError::malformed(format!("unknown action '{}'", self.action)))
    }
}

/// Parse a raw response body
pub fn parse_decision(body: &str) -> Result<Action, DecisionError> {
    serde_json::from_str::<DecisionResponse>(body)
        .map_err(|e| DecisionError::malformed(e.to_string()))?
        .into_action()
}

/// Anything that can choose an action for a snapshot
pub trait DecisionService {
    fn decide(&mut self, snapshot: &Snapshot) -> Result<Action, DecisionError>;

    /// Short label for logs
    fn name(&self) -> &str;
}

/// The local heuristic as a service (never fails)
#[derive(Debug, Clone)]
pub struct HeuristicService {
    pub lookahead: f32,
}

impl HeuristicService {
    pub fn new(lookahead: f32) -> Self {
        Self { lookahead }
    }
}

impl DecisionService for HeuristicService {
    fn decide(&mut self, snapshot: &Snapshot) -> Result<Action, DecisionError> {
        Ok(heuristic_action(snapshot, self.lookahead))
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

/// Where an action came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Service,
    Fallback,
}

/// Tracks service health so a dead service is reported once, not every tick
#[derive(Debug, Clone, Default)]
pub struct FailureLog {
    failing: bool,
    failures: u64,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&mut self, service: &str, err: &DecisionError) {
        self.failures += 1;
        if !self.failing {
            log::warn!("{} failed ({}), using heuristic fallback", service, err);
            self.failing = true;
        } else {
            log::debug!("{} still failing: {}", service, err);
        }
    }

    pub fn record_success(&mut self, service: &str) {
        if self.failing {
            log::info!("{} recovered after {} failures", service, self.failures);
            self.failing = false;
            self.failures = 0;
        }
    }

    pub fn is_failing(&self) -> bool {
        self.failing
    }
}

/// Ask `service`, falling back to the heuristic on the same snapshot
pub fn decide_or_fallback<S: DecisionService + ?Sized>(
    service: &mut S,
    snapshot: &Snapshot,
    lookahead: f32,
    failures: &mut FailureLog,
) -> (Action, DecisionSource) {
    match service.decide(snapshot) {
        Ok(action) => {
            failures.record_success(service.name());
            (action, DecisionSource::Service)
        }
        Err(e) => {
            failures.record_error(service.name(), &e);
            (heuristic_action(snapshot, lookahead), DecisionSource::Fallback)
        }
    }
}

/// Remote decision service over blocking HTTP
///
/// Blocks for up to `timeout`; run it on a `DecisionWorker` thread, never on
/// the tick loop.
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpDecisionService {
    agent: ureq::Agent,
    url: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpDecisionService {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            url: format!("{}{}", base_url.trim_end_matches('/'), DECISION_PATH),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl DecisionService for HttpDecisionService {
    fn decide(&mut self, snapshot: &Snapshot) -> Result<Action, DecisionError> {
        let response = self
            .agent
            .post(&self.url)
            .send_json(snapshot)
            .map_err(|e| DecisionError::transport(e.to_string()))?;
        let body: DecisionResponse = response
            .into_json()
            .map_err(|e| DecisionError::malformed(e.to_string()))?;
        body.into_action()
    }

    fn name(&self) -> &str {
        "decision service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::{GameState, Obstacle, ObstacleKind};

    /// Service stub returning a fixed result
    struct Scripted(Result<Action, DecisionError>);

    impl DecisionService for Scripted {
        fn decide(&mut self, _snapshot: &Snapshot) -> Result<Action, DecisionError> {
            self.0.clone()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn cactus_ahead() -> Snapshot {
        let config = GameConfig::default();
        let mut state = GameState::new(1, &config);
        state
            .obstacles
            .push(Obstacle::new(1, ObstacleKind::GroundLow, 100.0, 0.0));
        Snapshot::capture(&state, &config)
    }

    #[test]
    fn test_parse_decision() {
        assert_eq!(
            parse_decision(r#"{"action":"jump","confidence":0.9}"#),
            Ok(Action::Jump)
        );
        assert_eq!(parse_decision(r#"{"action":"DUCK"}"#), Ok(Action::Duck));
        assert!(matches!(
            parse_decision(r#"{"action":"fly"}"#),
            Err(DecisionError::Malformed(_))
        ));
        assert!(matches!(
            parse_decision("<html>502</html>"),
            Err(DecisionError::Malformed(_))
        ));
    }

    #[test]
    fn test_service_answer_is_used() {
        let mut service = Scripted(Ok(Action::Duck));
        let mut failures = FailureLog::new();
        let (action, source) = decide_or_fallback(&mut service, &cactus_ahead(), 100.0, &mut failures);
        assert_eq!(action, Action::Duck);
        assert_eq!(source, DecisionSource::Service);
    }

    #[test]
    fn test_failure_falls_back_to_heuristic() {
        let mut service = Scripted(Err(DecisionError::transport("connection refused")));
        let mut failures = FailureLog::new();
        let (action, source) = decide_or_fallback(&mut service, &cactus_ahead(), 100.0, &mut failures);
        assert_eq!(action, Action::Jump);
        assert_eq!(source, DecisionSource::Fallback);
        assert!(failures.is_failing());

        service.0 = Ok(Action::None);
        decide_or_fallback(&mut service, &cactus_ahead(), 100.0, &mut failures);
        assert!(!failures.is_failing());
    }

    #[test]
    fn test_heuristic_service_never_fails() {
        let mut service = HeuristicService::new(100.0);
        assert_eq!(service.decide(&cactus_ahead()), Ok(Action::Jump));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_http_url_joins_path() {
        let service = HttpDecisionService::new("http://localhost:5000/", std::time::Duration::from_millis(50));
        assert_eq!(service.url(), "http://localhost:5000/ai-decision");
    }
}
