//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint
//!     → executor.rs (attempt loop, retry decision)
//!     → transport.rs (HTTP GET, status or transport error)
//!     → one ProbeAttempt per call → event sink
//!     → one ProbeResult per endpoint per cycle → caller
//! ```
//!
//! # Design Decisions
//! - Status mismatches are terminal; only transport failures are retried
//! - `TransientError` exists only on attempts, never on results
//!   (`ProbeResult` carries a `TerminalOutcome`)
//! - The executor never returns an error; exhaustion is an outcome

pub mod executor;
pub mod transport;
pub mod types;

pub use executor::{ProbeExecutor, ProbePolicy};
pub use transport::{HttpTransport, ReqwestTransport, TransportError, TransportErrorKind};
pub use types::{Outcome, ProbeAttempt, ProbeResult, TerminalOutcome};
