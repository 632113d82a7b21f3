//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe executor, session runner, sinks produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging with url/attempt/outcome fields for machine parsing
//! - Metrics are cheap (atomic increments) and recorded unconditionally; without
//!   an installed recorder they are no-ops

pub mod logging;
pub mod metrics;
