//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe attempt:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On transport failure: retries.rs (retries left? wait fixed delay, try again)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every probe has a deadline
//! - Only transport failures are retried; any HTTP status is a definitive answer
//! - Backoff is fixed, not exponential: the delay is operator policy
//! - Waiting is a scheduled resumption (`tokio::time::sleep`), never a blocking sleep

pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
pub use timeouts::{with_timeout, Elapsed};
