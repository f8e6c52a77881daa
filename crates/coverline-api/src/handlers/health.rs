use axum::{extract::State, response::Json};
use serde::Serialize;

use coverline_types::HealthStatus;

use crate::state::AppState;

/// Health probe response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
	pub status: HealthStatus,
	pub timestamp: chrono::DateTime<chrono::Utc>,
	pub uptime_seconds: u64,
	pub version: &'static str,
	pub error_rate: f64,
	pub avg_response_time_ms: f64,
	pub cache_degraded: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub memory_rss_kb: Option<u64>,
}

/// GET /health - Health probe with fixed-threshold degradation judgment
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	let report = state.metrics.health_report();
	let snapshot = state.metrics.snapshot();

	Json(HealthResponse {
		status: report.status,
		timestamp: chrono::Utc::now(),
		uptime_seconds: snapshot.uptime_seconds,
		version: env!("CARGO_PKG_VERSION"),
		error_rate: report.error_rate,
		avg_response_time_ms: report.avg_response_time_ms,
		cache_degraded: state.cache.is_degraded(),
		memory_rss_kb: read_rss_kb(),
	})
}

/// Resident set size from /proc, absent on platforms without procfs
fn read_rss_kb() -> Option<u64> {
	let status = std::fs::read_to_string("/proc/self/status").ok()?;
	status
		.lines()
		.find(|line| line.starts_with("VmRSS:"))?
		.split_whitespace()
		.nth(1)?
		.parse()
		.ok()
}
