//! Metrics snapshot and health models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Full point-in-time snapshot of the metrics collector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
	pub total_requests: u64,
	pub successful_requests: u64,
	pub failed_requests: u64,
	pub cached_requests: u64,
	/// Cache hits over total requests (0.0 - 1.0)
	pub cache_hit_rate: f64,
	pub providers: HashMap<String, ProviderStats>,
	pub response_times: ResponseTimeStats,
	pub recent_errors: Vec<ErrorRecord>,
	pub uptime_seconds: u64,
}

/// Per-provider request counters and latency
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStats {
	pub requests: u64,
	pub successes: u64,
	pub failures: u64,
	pub success_rate: f64,
	pub avg_latency_ms: f64,
}

/// Percentiles over the rolling response-time window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeStats {
	pub sample_count: usize,
	pub avg_ms: f64,
	pub p50_ms: u64,
	pub p95_ms: u64,
	pub p99_ms: u64,
}

/// One entry in the bounded recent-error buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
	pub timestamp: DateTime<Utc>,
	pub message: String,
}

/// Coarse service health derived from fixed thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
	Healthy,
	Degraded,
}

/// Health status plus the figures it was derived from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
	pub status: HealthStatus,
	pub error_rate: f64,
	pub avg_response_time_ms: f64,
	pub recent_error_count: usize,
}
