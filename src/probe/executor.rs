//! Probe executor: one endpoint, one cycle, with retries.
//!
//! # State Machine
//! ```text
//! attempt n:
//!     status == expected        → Up           (terminal)
//!     status != expected        → Down         (terminal, never retried)
//!     transport error, n ≤ max  → TransientError → wait delay → attempt n+1
//!     transport error, n > max  → FailedFinal  (terminal)
//! ```
//!
//! Every attempt is written to the event sink; only the terminal outcome is
//! returned as a `ProbeResult`.

use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::Utc;

use crate::config::{ProbeConfig, ValidationError};
use crate::observability::metrics;
use crate::probe::transport::{HttpTransport, TransportError};
use crate::probe::{Outcome, ProbeAttempt, ProbeResult, TerminalOutcome};
use crate::registry::Endpoint;
use crate::resilience::{with_timeout, RetryPolicy};
use crate::sink::{self, AttemptRecord, CycleId, EventSink, MonitorEvent};

/// Retry policy plus per-attempt deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub retry: RetryPolicy,
    pub attempt_timeout: Duration,
}

impl ProbePolicy {
    pub fn new(
        max_retries: u32,
        attempt_timeout: Duration,
        retry_delay: Duration,
    ) -> Result<Self, ValidationError> {
        if attempt_timeout.is_zero() {
            return Err(ValidationError::NotPositive { field: "probe.timeout_ms" });
        }
        Ok(Self {
            retry: RetryPolicy::new(max_retries, retry_delay),
            attempt_timeout,
        })
    }

    pub fn from_config(config: &ProbeConfig) -> Result<Self, ValidationError> {
        Self::new(config.max_retries, config.timeout(), config.retry_delay())
    }
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Runs the probe state machine against a transport.
pub struct ProbeExecutor {
    transport: Arc<dyn HttpTransport>,
    sink: Arc<dyn EventSink>,
    policy: ProbePolicy,
}

impl ProbeExecutor {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        sink: Arc<dyn EventSink>,
        policy: ProbePolicy,
    ) -> Self {
        Self {
            transport,
            sink,
            policy,
        }
    }

    /// Probe `endpoint` until a terminal outcome is reached.
    ///
    /// Never fails: exhausting retries yields `FailedFinal`.
    pub async fn probe(&self, endpoint: &Arc<Endpoint>, id: CycleId) -> ProbeResult {
        let started = Instant::now();
        let mut attempt_number = 1;

        loop {
            match self.call(&endpoint.url).await {
                Ok(status) => {
                    let outcome = if status == endpoint.expected_status {
                        TerminalOutcome::Up
                    } else {
                        TerminalOutcome::Down
                    };

                    match outcome {
                        TerminalOutcome::Up => tracing::info!(
                            url = %endpoint.url,
                            status,
                            attempt = attempt_number,
                            "Endpoint is UP"
                        ),
                        _ => tracing::warn!(
                            url = %endpoint.url,
                            status,
                            expected = endpoint.expected_status,
                            attempt = attempt_number,
                            "Endpoint is DOWN"
                        ),
                    }

                    self.record_attempt(
                        endpoint,
                        id,
                        attempt_number,
                        outcome.into(),
                        Some(status),
                        None,
                    )
                    .await;
                    return self.finish(
                        endpoint,
                        outcome,
                        attempt_number,
                        Some(status),
                        None,
                        started,
                    );
                }
                Err(e) if self.policy.retry.should_retry(attempt_number) => {
                    tracing::warn!(
                        url = %endpoint.url,
                        attempt = attempt_number,
                        error = %e,
                        retry_in_ms = self.policy.retry.delay.as_millis() as u64,
                        "Probe attempt failed, retrying"
                    );
                    self.record_attempt(
                        endpoint,
                        id,
                        attempt_number,
                        Outcome::TransientError,
                        None,
                        Some(e.to_string()),
                    )
                    .await;

                    self.policy.retry.wait().await;
                    attempt_number += 1;
                }
                Err(e) => {
                    tracing::error!(
                        url = %endpoint.url,
                        attempts = attempt_number,
                        error = %e,
                        "Endpoint failed after all attempts"
                    );
                    let error = Some(e.to_string());
                    self.record_attempt(
                        endpoint,
                        id,
                        attempt_number,
                        Outcome::FailedFinal,
                        None,
                        error.clone(),
                    )
                    .await;
                    return self.finish(
                        endpoint,
                        TerminalOutcome::FailedFinal,
                        attempt_number,
                        None,
                        error,
                        started,
                    );
                }
            }
        }
    }

    /// One HTTP call bounded by the attempt deadline.
    async fn call(&self, url: &str) -> Result<u16, TransportError> {
        let limit = self.policy.attempt_timeout;
        match with_timeout(limit, self.transport.get(url, limit)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::timeout(limit)),
        }
    }

    async fn record_attempt(
        &self,
        endpoint: &Arc<Endpoint>,
        id: CycleId,
        attempt_number: u32,
        outcome: Outcome,
        observed_status: Option<u16>,
        error: Option<String>,
    ) {
        let attempt = ProbeAttempt {
            endpoint: endpoint.clone(),
            attempt_number,
            outcome,
            observed_status,
            error,
            timestamp: Utc::now(),
        };
        metrics::record_attempt(&endpoint.url, outcome);
        sink::emit(
            self.sink.as_ref(),
            MonitorEvent::Attempt(AttemptRecord::new(id, &attempt)),
        )
        .await;
    }

    fn finish(
        &self,
        endpoint: &Arc<Endpoint>,
        outcome: TerminalOutcome,
        attempts: u32,
        observed_status: Option<u16>,
        error: Option<String>,
        started: Instant,
    ) -> ProbeResult {
        metrics::record_result(&endpoint.url, outcome);
        ProbeResult {
            endpoint: endpoint.clone(),
            outcome,
            attempts,
            observed_status,
            error,
            timestamp: Utc::now(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::sink::MemorySink;

    /// Replays a fixed list of responses, repeating the last one.
    struct Script(Mutex<Vec<Result<u16, TransportError>>>);

    impl Script {
        fn new(responses: Vec<Result<u16, TransportError>>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(responses)))
        }
    }

    #[async_trait]
    impl HttpTransport for Script {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<u16, TransportError> {
            let mut responses = self.0.lock().unwrap();
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        }
    }

    /// Never answers.
    struct Hang;

    #[async_trait]
    impl HttpTransport for Hang {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<u16, TransportError> {
            std::future::pending().await
        }
    }

    fn cycle() -> CycleId {
        CycleId {
            session_id: Uuid::nil(),
            cycle: 1,
        }
    }

    fn policy(max_retries: u32) -> ProbePolicy {
        ProbePolicy::new(max_retries, Duration::from_millis(200), Duration::ZERO).unwrap()
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_error() {
        let sink = Arc::new(MemorySink::new());
        let executor = ProbeExecutor::new(
            Script::new(vec![Err(TransportError::connect("refused"))]),
            sink.clone(),
            policy(0),
        );
        let endpoint = Arc::new(Endpoint::new("https://a.test", 200));

        let result = executor.probe(&endpoint, cycle()).await;
        assert_eq!(result.outcome, TerminalOutcome::FailedFinal);
        assert_eq!(result.attempts, 1);
        assert_eq!(result.observed_status, None);
        assert!(result.error.unwrap().contains("refused"));

        let attempts = sink.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].outcome, Outcome::FailedFinal);
    }

    #[tokio::test]
    async fn test_hanging_transport_times_out() {
        let sink = Arc::new(MemorySink::new());
        let executor = ProbeExecutor::new(
            Arc::new(Hang),
            sink.clone(),
            ProbePolicy::new(1, Duration::from_millis(20), Duration::ZERO).unwrap(),
        );
        let endpoint = Arc::new(Endpoint::new("https://a.test", 200));

        let result = executor.probe(&endpoint, cycle()).await;
        assert_eq!(result.outcome, TerminalOutcome::FailedFinal);
        assert_eq!(result.attempts, 2);
        assert!(result.error.unwrap().starts_with("timeout error"));
    }

    #[tokio::test]
    async fn test_expected_non_200_status_is_up() {
        let sink = Arc::new(MemorySink::new());
        let executor = ProbeExecutor::new(Script::new(vec![Ok(400)]), sink.clone(), policy(2));
        let endpoint = Arc::new(Endpoint::new("https://a.test", 400));

        let result = executor.probe(&endpoint, cycle()).await;
        assert_eq!(result.outcome, TerminalOutcome::Up);
        assert_eq!(result.observed_status, Some(400));
        assert_eq!(sink.attempts()[0].observed_status, Some(400));
    }

    #[test]
    fn test_policy_rejects_zero_timeout() {
        let err = ProbePolicy::new(2, Duration::ZERO, Duration::from_secs(5)).unwrap_err();
        assert_eq!(err, ValidationError::NotPositive { field: "probe.timeout_ms" });
    }

    #[test]
    fn test_policy_from_default_config() {
        let policy = ProbePolicy::from_config(&ProbeConfig::default()).unwrap();
        assert_eq!(policy, ProbePolicy::default());
    }
}
