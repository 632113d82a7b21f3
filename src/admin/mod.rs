//! Read-only admin API.
//!
//! Exposes the live aggregate counters and the latest cycle report to
//! reporting consumers. Handlers only read snapshots, so a slow client can
//! never hold up the monitor.

pub mod handlers;

use std::sync::Arc;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::aggregate::Aggregator;
use crate::registry::Registry;
use crate::session::LatestReport;
use self::handlers::*;

/// State shared with admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub registry: Arc<Registry>,
    pub aggregator: Arc<Aggregator>,
    pub latest: LatestReport,
    pub session_id: uuid::Uuid,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/endpoints", get(get_endpoints))
        .route("/admin/counters", get(get_counters))
        .route("/admin/cycles/latest", get(get_latest_cycle))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
