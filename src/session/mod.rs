//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! scheduler.rs (fixed interval, shutdown between cycles)
//!     → runner.rs (one full pass over the registry)
//!         → ProbeExecutor per endpoint (bounded concurrency)
//!         → EventSink (result records + cycle markers)
//!         → Aggregator (whole cycle applied atomically)
//!     → CycleReport published for reporting consumers
//! ```
//!
//! # Design Decisions
//! - A session is one process run, identified by a random UUID
//! - A cycle is never interrupted; shutdown is observed between cycles
//! - Reporting consumers read the latest report through `ArcSwapOption`
//!   and never block the runner

pub mod runner;
pub mod scheduler;

use std::collections::BTreeMap;
use std::sync::Arc;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::Counters;
use crate::probe::ProbeResult;

pub use runner::SessionRunner;
pub use scheduler::Monitor;

/// Shared slot holding the most recent completed cycle.
pub type LatestReport = Arc<ArcSwapOption<CycleReport>>;

/// Every endpoint's result for one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub session_id: Uuid,
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Keyed by endpoint url; contains every registered endpoint.
    pub results: BTreeMap<String, ProbeResult>,
}

impl CycleReport {
    pub fn get(&self, url: &str) -> Option<&ProbeResult> {
        self.results.get(url)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Outcome tally for this cycle alone.
    pub fn counts(&self) -> Counters {
        let mut counts = Counters::default();
        for result in self.results.values() {
            counts.increment(result.outcome);
        }
        counts
    }
}
