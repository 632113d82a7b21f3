//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build registry, sink, transport, executor,
//!     aggregator, runner → Start admin API and metrics (optional)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Monitor finishes current cycle → Admin API drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then core, then listeners
//! - Fail fast: an invalid registry never starts monitoring
//! - Shutdown never interrupts a cycle in progress

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Services, StartupError};
