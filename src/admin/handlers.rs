//! Admin API endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::control::{HealthReport, ResetOutcome};
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct RecoveryResponse {
    pub recovered: bool,
}

pub async fn admin_status(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.admin.status_snapshot().await)
}

pub async fn force_recovery(State(state): State<AppState>) -> Json<RecoveryResponse> {
    let recovered = state.admin.force_recovery_attempt().await;
    Json(RecoveryResponse { recovered })
}

pub async fn reset_breaker(State(state): State<AppState>) -> Json<ResetOutcome> {
    Json(state.admin.force_reset().await)
}
