//! Event sink subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeExecutor (one record per attempt)
//! SessionRunner (cycle markers + one result per endpoint)
//!     → EventSink::append
//!         - file.rs   (append-only JSON lines, replayable)
//!         - memory.rs (in-process buffer / discard)
//! ```
//!
//! # Design Decisions
//! - Append-only; records are never rewritten
//! - A failing sink never aborts a probe or a cycle: errors are logged and
//!   counted, then dropped
//! - Formatting for humans (console, charts) is a downstream replay concern

pub mod event;
pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::observability::metrics;

pub use event::{AttemptRecord, CycleId, MonitorEvent, ResultRecord};
pub use file::{read_events, JsonLinesSink};
pub use memory::{DiscardSink, MemorySink};

/// Errors raised while writing or replaying events.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("event log IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("malformed event on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable, append-only destination for monitor events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn append(&self, event: &MonitorEvent) -> Result<(), SinkError>;
}

/// Append `event`, logging instead of propagating failures.
pub async fn emit(sink: &dyn EventSink, event: MonitorEvent) {
    if let Err(e) = sink.append(&event).await {
        tracing::warn!(error = %e, "Failed to append event to sink");
        metrics::record_sink_error();
    }
}
