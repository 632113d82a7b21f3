//! Probe outcomes, attempts and results.

use std::fmt;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::registry::Endpoint;

/// Classification of a single HTTP call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Status matched the expected status.
    Up,
    /// A status was received but did not match.
    Down,
    /// Transport failure with retries remaining.
    TransientError,
    /// Transport failure with retries exhausted.
    FailedFinal,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Up => "up",
            Outcome::Down => "down",
            Outcome::TransientError => "transient_error",
            Outcome::FailedFinal => "failed_final",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outcome that ends the retry sequence for one endpoint in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalOutcome {
    Up,
    Down,
    FailedFinal,
}

impl TerminalOutcome {
    pub fn as_str(&self) -> &'static str {
        Outcome::from(*self).as_str()
    }

    pub fn is_up(&self) -> bool {
        matches!(self, TerminalOutcome::Up)
    }
}

impl From<TerminalOutcome> for Outcome {
    fn from(outcome: TerminalOutcome) -> Self {
        match outcome {
            TerminalOutcome::Up => Outcome::Up,
            TerminalOutcome::Down => Outcome::Down,
            TerminalOutcome::FailedFinal => Outcome::FailedFinal,
        }
    }
}

impl fmt::Display for TerminalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one HTTP call. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeAttempt {
    pub endpoint: Arc<Endpoint>,
    /// 1-based attempt number within the cycle.
    pub attempt_number: u32,
    pub outcome: Outcome,
    pub observed_status: Option<u16>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Terminal result for one endpoint in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub endpoint: Arc<Endpoint>,
    pub outcome: TerminalOutcome,
    /// Number of HTTP calls made, including the final one.
    pub attempts: u32,
    pub observed_status: Option<u16>,
    /// Error of the last attempt, set only for `FailedFinal`.
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Wall time from the first attempt to the result, including retry delays.
    pub elapsed_ms: u64,
}

impl ProbeResult {
    pub fn url(&self) -> &str {
        &self.endpoint.url
    }
}
