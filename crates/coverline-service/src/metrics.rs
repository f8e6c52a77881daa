//! Request and provider metrics collection
//!
//! Counters are monotonically increasing for the process lifetime. Response
//! times live in a bounded rolling window and errors in a bounded ring
//! buffer, so memory stays flat regardless of traffic volume.

use chrono::Utc;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

use coverline_types::constants::{
	DEGRADED_AVG_RESPONSE_TIME_MS, DEGRADED_ERROR_RATE, DEGRADED_RECENT_ERROR_COUNT,
	RECENT_ERROR_CAPACITY, RESPONSE_TIME_WINDOW_CAPACITY,
};
use coverline_types::{
	ErrorRecord, HealthReport, HealthStatus, MetricsSnapshot, ProviderStats, ResponseTimeStats,
};

#[derive(Default)]
struct ProviderCounters {
	requests: u64,
	successes: u64,
	failures: u64,
	total_latency_ms: u64,
}

#[derive(Default)]
struct MetricsInner {
	total_requests: u64,
	successful_requests: u64,
	failed_requests: u64,
	cached_requests: u64,
	providers: HashMap<String, ProviderCounters>,
	response_times: VecDeque<u64>,
	recent_errors: VecDeque<ErrorRecord>,
}

/// Process-wide metrics collector shared across request handlers
pub struct MetricsCollector {
	inner: Mutex<MetricsInner>,
	started_at: Instant,
}

impl Default for MetricsCollector {
	fn default() -> Self {
		Self::new()
	}
}

impl MetricsCollector {
	pub fn new() -> Self {
		Self {
			inner: Mutex::new(MetricsInner::default()),
			started_at: Instant::now(),
		}
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, MetricsInner> {
		// A poisoned lock only means another handler panicked mid-update;
		// the counters themselves are still usable.
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Record a fully aggregated (non-cached) successful request
	pub fn record_request_success(
		&self,
		response_time_ms: u64,
		quote_count: usize,
		providers_responded: u32,
	) {
		debug!(
			"Request succeeded in {}ms with {} quotes from {} providers",
			response_time_ms, quote_count, providers_responded
		);

		let mut inner = self.lock();
		inner.total_requests += 1;
		inner.successful_requests += 1;
		if inner.response_times.len() >= RESPONSE_TIME_WINDOW_CAPACITY {
			inner.response_times.pop_front();
		}
		inner.response_times.push_back(response_time_ms);
	}

	/// Record a request served from the response cache
	pub fn record_cache_hit(&self) {
		let mut inner = self.lock();
		inner.total_requests += 1;
		inner.successful_requests += 1;
		inner.cached_requests += 1;
	}

	/// Record a failed request
	pub fn record_error(&self, message: impl Into<String>) {
		let mut inner = self.lock();
		inner.total_requests += 1;
		inner.failed_requests += 1;
		if inner.recent_errors.len() >= RECENT_ERROR_CAPACITY {
			inner.recent_errors.pop_front();
		}
		inner.recent_errors.push_back(ErrorRecord {
			timestamp: Utc::now(),
			message: message.into(),
		});
	}

	/// Record the outcome of one provider call within a request
	pub fn record_provider_result(&self, provider_id: &str, success: bool, latency_ms: u64) {
		let mut inner = self.lock();
		let counters = inner.providers.entry(provider_id.to_string()).or_default();
		counters.requests += 1;
		counters.total_latency_ms += latency_ms;
		if success {
			counters.successes += 1;
		} else {
			counters.failures += 1;
		}
	}

	/// Point-in-time snapshot of all counters and the response-time window
	pub fn snapshot(&self) -> MetricsSnapshot {
		let inner = self.lock();

		let mut sorted: Vec<u64> = inner.response_times.iter().copied().collect();
		sorted.sort_unstable();

		let avg_ms = if sorted.is_empty() {
			0.0
		} else {
			sorted.iter().sum::<u64>() as f64 / sorted.len() as f64
		};

		let providers = inner
			.providers
			.iter()
			.map(|(id, counters)| {
				(
					id.clone(),
					ProviderStats {
						requests: counters.requests,
						successes: counters.successes,
						failures: counters.failures,
						success_rate: if counters.requests == 0 {
							0.0
						} else {
							counters.successes as f64 / counters.requests as f64
						},
						avg_latency_ms: if counters.requests == 0 {
							0.0
						} else {
							counters.total_latency_ms as f64 / counters.requests as f64
						},
					},
				)
			})
			.collect();

		MetricsSnapshot {
			total_requests: inner.total_requests,
			successful_requests: inner.successful_requests,
			failed_requests: inner.failed_requests,
			cached_requests: inner.cached_requests,
			cache_hit_rate: if inner.total_requests == 0 {
				0.0
			} else {
				inner.cached_requests as f64 / inner.total_requests as f64
			},
			providers,
			response_times: ResponseTimeStats {
				sample_count: sorted.len(),
				avg_ms,
				p50_ms: percentile(&sorted, 50.0),
				p95_ms: percentile(&sorted, 95.0),
				p99_ms: percentile(&sorted, 99.0),
			},
			recent_errors: inner.recent_errors.iter().cloned().collect(),
			uptime_seconds: self.started_at.elapsed().as_secs(),
		}
	}

	/// Health judgment from fixed thresholds over current counters
	pub fn health_report(&self) -> HealthReport {
		let inner = self.lock();

		let error_rate = if inner.total_requests == 0 {
			0.0
		} else {
			inner.failed_requests as f64 / inner.total_requests as f64
		};
		let avg_response_time_ms = if inner.response_times.is_empty() {
			0.0
		} else {
			inner.response_times.iter().sum::<u64>() as f64 / inner.response_times.len() as f64
		};
		let recent_error_count = inner.recent_errors.len();

		let degraded = error_rate > DEGRADED_ERROR_RATE
			|| avg_response_time_ms > DEGRADED_AVG_RESPONSE_TIME_MS
			|| recent_error_count > DEGRADED_RECENT_ERROR_COUNT;

		HealthReport {
			status: if degraded {
				HealthStatus::Degraded
			} else {
				HealthStatus::Healthy
			},
			error_rate,
			avg_response_time_ms,
			recent_error_count,
		}
	}
}

/// Nearest-rank percentile over an already sorted window
fn percentile(sorted: &[u64], p: f64) -> u64 {
	if sorted.is_empty() {
		return 0;
	}
	let rank = ((p / 100.0) * sorted.len() as f64).ceil() as usize;
	sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_percentiles_over_regular_window() {
		let collector = MetricsCollector::new();
		for sample in (10..=1000).step_by(10) {
			collector.record_request_success(sample, 6, 3);
		}

		let stats = collector.snapshot().response_times;
		assert_eq!(stats.sample_count, 100);
		assert_eq!(stats.p50_ms, 500);
		assert_eq!(stats.p95_ms, 950);
		assert_eq!(stats.p99_ms, 990);
	}

	#[test]
	fn test_percentile_of_empty_window_is_zero() {
		assert_eq!(percentile(&[], 95.0), 0);
		assert_eq!(percentile(&[42], 50.0), 42);
	}

	#[test]
	fn test_response_time_window_is_bounded() {
		let collector = MetricsCollector::new();
		for i in 0..(RESPONSE_TIME_WINDOW_CAPACITY as u64 + 250) {
			collector.record_request_success(i, 6, 3);
		}

		let snapshot = collector.snapshot();
		assert_eq!(
			snapshot.response_times.sample_count,
			RESPONSE_TIME_WINDOW_CAPACITY
		);
		// Oldest samples were discarded first, so the window holds 250..=1249
		assert_eq!(snapshot.response_times.p99_ms, 1239);
	}

	#[test]
	fn test_error_ring_is_bounded() {
		let collector = MetricsCollector::new();
		for i in 0..(RECENT_ERROR_CAPACITY + 20) {
			collector.record_error(format!("error {}", i));
		}

		let snapshot = collector.snapshot();
		assert_eq!(snapshot.recent_errors.len(), RECENT_ERROR_CAPACITY);
		assert_eq!(snapshot.recent_errors[0].message, "error 20");
	}

	#[test]
	fn test_cache_hit_rate() {
		let collector = MetricsCollector::new();
		collector.record_request_success(120, 6, 3);
		collector.record_cache_hit();
		collector.record_cache_hit();
		collector.record_cache_hit();

		let snapshot = collector.snapshot();
		assert_eq!(snapshot.total_requests, 4);
		assert_eq!(snapshot.cached_requests, 3);
		assert_eq!(snapshot.cache_hit_rate, 0.75);
	}

	#[test]
	fn test_health_degrades_on_error_rate() {
		let collector = MetricsCollector::new();
		for _ in 0..8 {
			collector.record_request_success(100, 6, 3);
		}
		collector.record_error("provider network unreachable");
		collector.record_error("provider network unreachable");

		// 2 failures of 10 requests = 20% > 10% threshold
		let report = collector.health_report();
		assert_eq!(report.status, HealthStatus::Degraded);
		assert!(report.error_rate > DEGRADED_ERROR_RATE);
	}

	#[test]
	fn test_health_is_healthy_under_thresholds() {
		let collector = MetricsCollector::new();
		for _ in 0..20 {
			collector.record_request_success(150, 6, 3);
		}
		collector.record_error("one-off failure");

		let report = collector.health_report();
		assert_eq!(report.status, HealthStatus::Healthy);
	}

	#[test]
	fn test_provider_stats() {
		let collector = MetricsCollector::new();
		collector.record_provider_result("apex-rate", true, 100);
		collector.record_provider_result("apex-rate", true, 200);
		collector.record_provider_result("apex-rate", false, 300);

		let snapshot = collector.snapshot();
		let stats = &snapshot.providers["apex-rate"];
		assert_eq!(stats.requests, 3);
		assert_eq!(stats.successes, 2);
		assert_eq!(stats.failures, 1);
		assert!((stats.success_rate - 2.0 / 3.0).abs() < 1e-9);
		assert_eq!(stats.avg_latency_ms, 200.0);
	}
}
