//! In-process sinks.

use std::sync::Mutex;
use async_trait::async_trait;

use crate::sink::{AttemptRecord, EventSink, MonitorEvent, ResultRecord, SinkError};

/// Keeps every event in memory, in append order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<MonitorEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().expect("memory sink mutex poisoned").clone()
    }

    pub fn attempts(&self) -> Vec<AttemptRecord> {
        self.events()
            .iter()
            .filter_map(MonitorEvent::as_attempt)
            .cloned()
            .collect()
    }

    pub fn results(&self) -> Vec<ResultRecord> {
        self.events()
            .iter()
            .filter_map(MonitorEvent::as_result)
            .cloned()
            .collect()
    }

    pub fn attempts_for(&self, url: &str) -> Vec<AttemptRecord> {
        self.attempts().into_iter().filter(|a| a.url == url).collect()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn append(&self, event: &MonitorEvent) -> Result<(), SinkError> {
        self.events
            .lock()
            .expect("memory sink mutex poisoned")
            .push(event.clone());
        Ok(())
    }
}

/// Drops every event. Used when the event log is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

#[async_trait]
impl EventSink for DiscardSink {
    async fn append(&self, _event: &MonitorEvent) -> Result<(), SinkError> {
        Ok(())
    }
}
