use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::admin::AdminState;
use crate::aggregate::{AggregateSnapshot, Counters};
use crate::probe::TerminalOutcome;
use crate::session::CycleReport;

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub status: String,
    pub session_id: Uuid,
    pub endpoints: usize,
    pub cycles_completed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointStatus {
    pub url: String,
    pub expected_status: u16,
    pub last_outcome: Option<TerminalOutcome>,
    pub last_status: Option<u16>,
    pub counters: Counters,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let cycles_completed = state.latest.load_full().map_or(0, |r| r.cycle);
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "operational".to_string(),
        session_id: state.session_id,
        endpoints: state.registry.len(),
        cycles_completed,
    })
}

pub async fn get_endpoints(State(state): State<AdminState>) -> Json<Vec<EndpointStatus>> {
    let snapshot = state.aggregator.snapshot();
    let latest = state.latest.load_full();

    let statuses = state
        .registry
        .endpoints()
        .iter()
        .map(|endpoint| {
            let last = latest.as_ref().and_then(|r| r.get(&endpoint.url));
            EndpointStatus {
                url: endpoint.url.clone(),
                expected_status: endpoint.expected_status,
                last_outcome: last.map(|r| r.outcome),
                last_status: last.and_then(|r| r.observed_status),
                counters: snapshot.get(&endpoint.url).copied().unwrap_or_default(),
            }
        })
        .collect();

    Json(statuses)
}

pub async fn get_counters(State(state): State<AdminState>) -> Json<AggregateSnapshot> {
    Json(state.aggregator.snapshot())
}

pub async fn get_latest_cycle(
    State(state): State<AdminState>,
) -> Result<Json<Arc<CycleReport>>, StatusCode> {
    state.latest.load_full().map(Json).ok_or(StatusCode::NOT_FOUND)
}
