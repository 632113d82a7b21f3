//! Session runner: one cycle over the whole registry.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use chrono::Utc;
use futures_util::stream::{self, StreamExt};
use uuid::Uuid;

use crate::aggregate::Aggregator;
use crate::observability::metrics;
use crate::probe::{ProbeExecutor, ProbeResult};
use crate::registry::Registry;
use crate::session::CycleReport;
use crate::sink::{self, CycleId, EventSink, MonitorEvent, ResultRecord};

/// Probes every endpoint once per call to [`SessionRunner::run_cycle`].
pub struct SessionRunner {
    registry: Arc<Registry>,
    executor: Arc<ProbeExecutor>,
    aggregator: Arc<Aggregator>,
    sink: Arc<dyn EventSink>,
    max_concurrency: usize,
    session_id: Uuid,
    cycles: AtomicU64,
}

impl SessionRunner {
    pub fn new(
        registry: Arc<Registry>,
        executor: Arc<ProbeExecutor>,
        aggregator: Arc<Aggregator>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            registry,
            executor,
            aggregator,
            sink,
            max_concurrency: 1,
            session_id: Uuid::new_v4(),
            cycles: AtomicU64::new(0),
        }
    }

    /// Probe up to `n` endpoints at once (clamped to at least 1).
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn aggregator(&self) -> &Arc<Aggregator> {
        &self.aggregator
    }

    /// Cycles started so far in this session.
    pub fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Run one full pass and return every endpoint's result.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
        let id = CycleId {
            session_id: self.session_id,
            cycle,
        };
        let start = Instant::now();
        let started_at = Utc::now();

        tracing::info!(
            session = %self.session_id,
            cycle,
            endpoints = self.registry.len(),
            concurrency = self.max_concurrency,
            "Starting monitoring cycle"
        );
        sink::emit(
            self.sink.as_ref(),
            MonitorEvent::CycleStarted {
                session_id: self.session_id,
                cycle,
                timestamp: started_at,
                endpoints: self.registry.len(),
            },
        )
        .await;

        // `buffered` keeps registry order while probing concurrently.
        let executor = self.executor.as_ref();
        let results: Vec<ProbeResult> = stream::iter(self.registry.endpoints().iter())
            .map(move |endpoint| executor.probe(endpoint, id))
            .buffered(self.max_concurrency)
            .collect()
            .await;

        for result in &results {
            sink::emit(
                self.sink.as_ref(),
                MonitorEvent::Result(ResultRecord::new(id, result)),
            )
            .await;
        }

        let report = CycleReport {
            session_id: self.session_id,
            cycle,
            started_at,
            finished_at: Utc::now(),
            results: results
                .into_iter()
                .map(|r| (r.endpoint.url.clone(), r))
                .collect::<BTreeMap<_, _>>(),
        };
        debug_assert_eq!(report.len(), self.registry.len());
        self.aggregator.record_cycle(&report);

        let counts = report.counts();
        let elapsed_ms = start.elapsed().as_millis() as u64;
        sink::emit(
            self.sink.as_ref(),
            MonitorEvent::CycleFinished {
                session_id: self.session_id,
                cycle,
                timestamp: report.finished_at,
                up: counts.up,
                down: counts.down,
                failed: counts.failed,
                elapsed_ms,
            },
        )
        .await;
        metrics::record_cycle(start);

        tracing::info!(
            session = %self.session_id,
            cycle,
            up = counts.up,
            down = counts.down,
            failed = counts.failed,
            elapsed_ms,
            "Completed monitoring cycle"
        );

        report
    }
}
