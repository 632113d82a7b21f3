//! Result aggregation.
//!
//! # Responsibilities
//! - Maintain cumulative up/down/failed counts per endpoint
//! - Serve immutable snapshots to reporting consumers
//! - Rebuild counts by replaying an event log
//!
//! # Design Decisions
//! - Sole writer of the counters; every mutation goes through one mutex
//! - A whole cycle is applied under a single lock acquisition, so a snapshot
//!   never observes half of a cycle
//! - Counters only grow; `reset` is an explicit session boundary

use std::collections::BTreeMap;
use std::sync::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::probe::{ProbeResult, TerminalOutcome};
use crate::session::CycleReport;
use crate::sink::MonitorEvent;

/// Terminal outcome tally for one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub up: u64,
    pub down: u64,
    pub failed: u64,
}

impl Counters {
    pub fn new(up: u64, down: u64, failed: u64) -> Self {
        Self { up, down, failed }
    }

    /// Number of cycles this endpoint completed.
    pub fn total(&self) -> u64 {
        self.up + self.down + self.failed
    }

    /// Fraction of cycles that were `Up`, if any cycles were observed.
    pub fn availability(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.up as f64 / total as f64),
        }
    }

    pub(crate) fn increment(&mut self, outcome: TerminalOutcome) {
        match outcome {
            TerminalOutcome::Up => self.up += 1,
            TerminalOutcome::Down => self.down += 1,
            TerminalOutcome::FailedFinal => self.failed += 1,
        }
    }
}

/// Point-in-time copy of all counters, keyed by url.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSnapshot {
    pub counters: BTreeMap<String, Counters>,
}

impl AggregateSnapshot {
    pub fn get(&self, url: &str) -> Option<&Counters> {
        self.counters.get(url)
    }

    /// Sum over every endpoint.
    pub fn totals(&self) -> Counters {
        self.counters.values().fold(Counters::default(), |acc, c| {
            Counters::new(acc.up + c.up, acc.down + c.down, acc.failed + c.failed)
        })
    }
}

/// Owner of the aggregate counters.
#[derive(Debug, Default)]
pub struct Aggregator {
    counters: Mutex<BTreeMap<String, Counters>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one terminal result.
    pub fn record(&self, result: &ProbeResult) {
        self.record_outcome(result.url(), result.outcome);
    }

    fn record_outcome(&self, url: &str, outcome: TerminalOutcome) {
        let mut counters = self.counters.lock().expect("aggregator mutex poisoned");
        counters.entry(url.to_string()).or_default().increment(outcome);
    }

    /// Count every result of a cycle atomically.
    pub fn record_cycle(&self, report: &CycleReport) {
        let mut counters = self.counters.lock().expect("aggregator mutex poisoned");
        for result in report.results.values() {
            counters
                .entry(result.url().to_string())
                .or_default()
                .increment(result.outcome);
        }
    }

    /// Count every `result` record in an event stream, optionally limited to one session.
    ///
    /// Returns the number of results applied.
    pub fn replay<'a, I>(&self, events: I, session: Option<Uuid>) -> usize
    where
        I: IntoIterator<Item = &'a MonitorEvent>,
    {
        let mut counters = self.counters.lock().expect("aggregator mutex poisoned");
        let mut applied = 0;
        for record in events.into_iter().filter_map(MonitorEvent::as_result) {
            if session.is_some_and(|id| id != record.session_id) {
                continue;
            }
            counters
                .entry(record.url.clone())
                .or_default()
                .increment(record.outcome);
            applied += 1;
        }
        applied
    }

    /// Immutable copy of the current counters.
    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot {
            counters: self.counters.lock().expect("aggregator mutex poisoned").clone(),
        }
    }

    /// Clear all counters, returning the final values of the ended session.
    pub fn reset(&self) -> AggregateSnapshot {
        let mut counters = self.counters.lock().expect("aggregator mutex poisoned");
        AggregateSnapshot {
            counters: std::mem::take(&mut *counters),
        }
    }
}
