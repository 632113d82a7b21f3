//! Periodic cycle scheduling.
//!
//! # Responsibilities
//! - Run a cycle immediately, then once per interval
//! - Publish each completed report
//! - Stop cleanly on shutdown, only between cycles

use std::sync::Arc;
use std::time::Duration;
use arc_swap::ArcSwapOption;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::config::ScheduleConfig;
use crate::lifecycle::shutdown::triggered;
use crate::session::{LatestReport, SessionRunner};

pub struct Monitor {
    runner: Arc<SessionRunner>,
    interval: Duration,
    max_cycles: Option<u64>,
    latest: LatestReport,
}

impl Monitor {
    pub fn new(runner: Arc<SessionRunner>, config: &ScheduleConfig) -> Self {
        let max_cycles = (config.max_cycles > 0).then_some(config.max_cycles);
        Self::with_interval(runner, Duration::from_secs(config.interval_secs), max_cycles)
    }

    pub fn with_interval(
        runner: Arc<SessionRunner>,
        interval: Duration,
        max_cycles: Option<u64>,
    ) -> Self {
        Self {
            runner,
            interval,
            max_cycles,
            latest: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Handle to the most recent report, for reporting consumers.
    pub fn latest(&self) -> LatestReport {
        self.latest.clone()
    }

    /// Run until shutdown or `max_cycles`. Returns the number of completed cycles.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> u64 {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            max_cycles = ?self.max_cycles,
            "Monitor starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut completed = 0u64;

        loop {
            tokio::select! {
                // Prefer shutdown when both are ready, so a pending signal
                // is honored before another cycle starts.
                biased;
                _ = triggered(&mut shutdown) => {
                    tracing::info!(completed, "Monitor received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    let report = self.runner.run_cycle().await;
                    self.latest.store(Some(Arc::new(report)));
                    completed += 1;

                    if self.max_cycles.is_some_and(|max| completed >= max) {
                        tracing::info!(completed, "Configured cycle count reached");
                        break;
                    }
                }
            }
        }

        completed
    }
}
