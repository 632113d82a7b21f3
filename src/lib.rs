//! HTTP uptime monitor library.

pub mod config;
pub mod registry;
pub mod probe;
pub mod resilience;
pub mod sink;
pub mod aggregate;
pub mod session;
pub mod lifecycle;
pub mod observability;
pub mod admin;

pub use aggregate::{AggregateSnapshot, Aggregator, Counters};
pub use config::MonitorConfig;
pub use lifecycle::{Services, Shutdown};
pub use probe::{Outcome, ProbeExecutor, ProbePolicy, ProbeResult, TerminalOutcome};
pub use registry::{Endpoint, Registry};
pub use session::{CycleReport, Monitor, SessionRunner};
