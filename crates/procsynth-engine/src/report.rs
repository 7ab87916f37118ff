//! What the orchestrator did for one request

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

use procsynth_utils::error::GeneratorError;

/// Orchestrator state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum State {
    /// Calling the primary generator; `attempt` starts at 1
    TryPrimary { attempt: u32 },
    TrySecondary,
    /// Running the local deterministic pipeline
    Fallback,
    Done,
    /// The produced document failed validation
    Failed,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TryPrimary { attempt } => write!(f, "try_primary#{attempt}"),
            Self::TrySecondary => write!(f, "try_secondary"),
            Self::Fallback => write!(f, "fallback"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Which stage produced the returned document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Primary,
    Secondary,
    #[default]
    Fallback,
}

/// One failed generator call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageFailure {
    pub provider: String,
    pub kind: &'static str,
    pub message: String,
}

fn as_millis<S: Serializer>(delays: &[Duration], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(delays.iter().map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)))
}

/// Trace of one generation or optimization request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub source: GenerationSource,
    /// External generator calls made, across both providers
    pub attempts: u32,
    /// Sleeps taken between rate-limited primary attempts, in order
    #[serde(rename = "backoffDelaysMs", serialize_with = "as_millis")]
    pub backoff_delays: Vec<Duration>,
    /// Set when any provider reported exhausted quota; operators should be alerted
    pub quota_exceeded: bool,
    /// States visited, in order
    pub transitions: Vec<State>,
    pub failures: Vec<StageFailure>,
}

impl GenerationReport {
    pub(crate) fn enter(&mut self, state: State) {
        self.transitions.push(state);
    }

    pub(crate) fn record_failure(&mut self, provider: &str, error: &GeneratorError) {
        if matches!(error, GeneratorError::QuotaExceeded(_)) {
            self.quota_exceeded = true;
        }
        self.failures.push(StageFailure {
            provider: provider.to_string(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    #[must_use]
    pub fn final_state(&self) -> Option<State> {
        self.transitions.last().copied()
    }
}
