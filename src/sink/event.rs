//! Event records written to the sink.
//!
//! One `attempt` record per HTTP call, one `result` record per endpoint per
//! cycle, bracketed by `cycle_started` / `cycle_finished` markers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::probe::{Outcome, ProbeAttempt, ProbeResult, TerminalOutcome};

/// Identifies the cycle an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId {
    pub session_id: Uuid,
    /// 1-based cycle number within the session.
    pub cycle: u64,
}

/// A single HTTP call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub session_id: Uuid,
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub attempt: u32,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttemptRecord {
    pub fn new(id: CycleId, attempt: &ProbeAttempt) -> Self {
        Self {
            session_id: id.session_id,
            cycle: id.cycle,
            timestamp: attempt.timestamp,
            url: attempt.endpoint.url.clone(),
            attempt: attempt.attempt_number,
            outcome: attempt.outcome,
            observed_status: attempt.observed_status,
            error: attempt.error.clone(),
        }
    }
}

/// The terminal outcome for one endpoint in one cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub session_id: Uuid,
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub outcome: TerminalOutcome,
    pub attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl ResultRecord {
    pub fn new(id: CycleId, result: &ProbeResult) -> Self {
        Self {
            session_id: id.session_id,
            cycle: id.cycle,
            timestamp: result.timestamp,
            url: result.endpoint.url.clone(),
            outcome: result.outcome,
            attempts: result.attempts,
            observed_status: result.observed_status,
            error: result.error.clone(),
            elapsed_ms: result.elapsed_ms,
        }
    }
}

/// Everything the monitor records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MonitorEvent {
    CycleStarted {
        session_id: Uuid,
        cycle: u64,
        timestamp: DateTime<Utc>,
        endpoints: usize,
    },
    Attempt(AttemptRecord),
    Result(ResultRecord),
    CycleFinished {
        session_id: Uuid,
        cycle: u64,
        timestamp: DateTime<Utc>,
        up: u64,
        down: u64,
        failed: u64,
        elapsed_ms: u64,
    },
}

impl MonitorEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            MonitorEvent::CycleStarted { session_id, .. }
            | MonitorEvent::CycleFinished { session_id, .. } => *session_id,
            MonitorEvent::Attempt(r) => r.session_id,
            MonitorEvent::Result(r) => r.session_id,
        }
    }

    pub fn as_result(&self) -> Option<&ResultRecord> {
        match self {
            MonitorEvent::Result(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_attempt(&self) -> Option<&AttemptRecord> {
        match self {
            MonitorEvent::Attempt(r) => Some(r),
            _ => None,
        }
    }
}
