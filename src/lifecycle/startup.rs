//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every subsystem from a validated configuration, in dependency order
//! - Start optional listeners (metrics, admin API)
//! - Run the monitor until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The monitor loop starts last, after sinks and listeners are ready

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{setup_admin_router, AdminState};
use crate::aggregate::Aggregator;
use crate::config::{MonitorConfig, ValidationError};
use crate::config::loader::join_errors;
use crate::config::validation::validate_config;
use crate::lifecycle::shutdown::{triggered, Shutdown};
use crate::observability::metrics;
use crate::probe::{HttpTransport, ProbeExecutor, ProbePolicy, ReqwestTransport, TransportError};
use crate::registry::Registry;
use crate::session::{Monitor, SessionRunner};
use crate::sink::{DiscardSink, EventSink, JsonLinesSink, SinkError};

/// Fatal errors raised before monitoring begins.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join_errors(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to open event log: {0}")]
    EventLog(#[from] SinkError),

    #[error("failed to build HTTP client: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to bind admin API on {addr}: {source}")]
    AdminBind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<ValidationError> for StartupError {
    fn from(e: ValidationError) -> Self {
        StartupError::Config(vec![e])
    }
}

/// Fully wired monitor components.
pub struct Services {
    pub config: MonitorConfig,
    pub registry: Arc<Registry>,
    pub sink: Arc<dyn EventSink>,
    pub aggregator: Arc<Aggregator>,
    pub runner: Arc<SessionRunner>,
}

impl Services {
    /// Build with the production HTTP transport.
    pub async fn build(config: MonitorConfig) -> Result<Self, StartupError> {
        let transport = Arc::new(ReqwestTransport::new(&config.probe.user_agent)?);
        Self::build_with_transport(config, transport).await
    }

    pub async fn build_with_transport(
        config: MonitorConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, StartupError> {
        validate_config(&config).map_err(StartupError::Config)?;

        let registry =
            Arc::new(Registry::from_config(&config.endpoints).map_err(StartupError::Config)?);
        let policy = ProbePolicy::from_config(&config.probe)?;

        let sink: Arc<dyn EventSink> = if config.event_log.enabled {
            Arc::new(JsonLinesSink::open(&config.event_log.path).await?)
        } else {
            tracing::info!("Event log disabled");
            Arc::new(DiscardSink)
        };

        let aggregator = Arc::new(Aggregator::new());
        let executor = Arc::new(ProbeExecutor::new(transport, sink.clone(), policy));
        let runner = Arc::new(
            SessionRunner::new(registry.clone(), executor, aggregator.clone(), sink.clone())
                .with_max_concurrency(config.probe.max_concurrency),
        );

        tracing::info!(
            session = %runner.session_id(),
            endpoints = registry.len(),
            max_retries = policy.retry.max_retries,
            timeout_ms = policy.attempt_timeout.as_millis() as u64,
            retry_delay_ms = policy.retry.delay.as_millis() as u64,
            "Monitor services initialized"
        );

        Ok(Self {
            config,
            registry,
            sink,
            aggregator,
            runner,
        })
    }

    pub fn monitor(&self) -> Monitor {
        Monitor::new(self.runner.clone(), &self.config.schedule)
    }

    /// Run the monitor (plus optional listeners) until shutdown or the cycle limit.
    ///
    /// Returns the number of completed cycles.
    pub async fn run(self, shutdown: Arc<Shutdown>) -> Result<u64, StartupError> {
        let monitor_shutdown = shutdown.subscribe();
        if shutdown.is_triggered() {
            tracing::info!("Shutdown requested during startup");
        }

        if self.config.observability.metrics_enabled {
            if let Ok(addr) = self.config.observability.metrics_address.parse::<SocketAddr>() {
                metrics::init_metrics(addr);
            }
        }

        let monitor = self.monitor();

        let admin = if self.config.admin.enabled {
            let addr = self.config.admin.bind_address.clone();
            let listener = TcpListener::bind(addr.as_str())
                .await
                .map_err(|source| StartupError::AdminBind { addr: addr.clone(), source })?;
            tracing::info!(address = %addr, "Admin API listening");

            let router = setup_admin_router(AdminState {
                registry: self.registry.clone(),
                aggregator: self.aggregator.clone(),
                latest: monitor.latest(),
                session_id: self.runner.session_id(),
            });
            let mut admin_shutdown = shutdown.subscribe();
            Some(tokio::spawn(async move {
                let result = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        triggered(&mut admin_shutdown).await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Admin API stopped with error");
                }
            }))
        } else {
            None
        };

        let completed = monitor.run(monitor_shutdown).await;

        // A cycle limit ends the run without a signal; stop the listeners too.
        shutdown.trigger();
        if let Some(handle) = admin {
            let _ = handle.await;
        }

        let totals = self.aggregator.snapshot().totals();
        tracing::info!(
            completed,
            up = totals.up,
            down = totals.down,
            failed = totals.failed,
            "Monitor stopped"
        );
        Ok(completed)
    }
}
