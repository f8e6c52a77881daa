use axum::{extract::State, response::Json};

use coverline_types::MetricsSnapshot;

use crate::state::AppState;

/// GET /api/metrics - Full metrics snapshot
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
	Json(state.metrics.snapshot())
}
