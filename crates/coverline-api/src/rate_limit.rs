//! Fixed-window per-client rate limiting for the generate endpoint

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use coverline_types::constants::{DEFAULT_RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECONDS};

/// Rate limit policy applied per client key
#[derive(Debug, Clone)]
pub struct RateLimitPolicy {
	pub enabled: bool,
	pub max_requests: u32,
	pub window_seconds: u64,
}

impl Default for RateLimitPolicy {
	fn default() -> Self {
		Self {
			enabled: true,
			max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
			window_seconds: RATE_LIMIT_WINDOW_SECONDS,
		}
	}
}

#[derive(Debug, Clone)]
struct RequestCounter {
	count: u32,
	window_start: DateTime<Utc>,
}

/// Outcome of one rate limit check
#[derive(Debug, Clone)]
pub struct RateLimitDecision {
	pub allowed: bool,
	pub remaining: u32,
	pub reset_at: DateTime<Utc>,
}

/// In-memory fixed-window rate limiter keyed by client address
#[derive(Debug)]
pub struct RateLimiter {
	policy: RateLimitPolicy,
	counters: Arc<DashMap<String, RequestCounter>>,
}

impl RateLimiter {
	pub fn new(policy: RateLimitPolicy) -> Self {
		Self {
			policy,
			counters: Arc::new(DashMap::new()),
		}
	}

	fn window(&self) -> Duration {
		Duration::seconds(self.policy.window_seconds as i64)
	}

	/// Drop counters whose window has fully elapsed
	pub fn cleanup_expired(&self) {
		let now = Utc::now();
		let window = self.window();
		self.counters
			.retain(|_key, counter| now <= counter.window_start + window);
	}

	/// Check and record one request for the given client key
	pub fn check(&self, key: &str) -> RateLimitDecision {
		let now = Utc::now();

		if !self.policy.enabled {
			return RateLimitDecision {
				allowed: true,
				remaining: self.policy.max_requests,
				reset_at: now + self.window(),
			};
		}

		// Amortized cleanup so stale client entries don't accumulate
		if rand::random::<f64>() < 0.01 {
			self.cleanup_expired();
		}

		let mut entry = self
			.counters
			.entry(key.to_string())
			.or_insert_with(|| RequestCounter {
				count: 0,
				window_start: now,
			});
		let counter = entry.value_mut();

		if now > counter.window_start + self.window() {
			counter.count = 0;
			counter.window_start = now;
		}

		let allowed = counter.count < self.policy.max_requests;
		if allowed {
			counter.count += 1;
		}

		RateLimitDecision {
			allowed,
			remaining: self.policy.max_requests.saturating_sub(counter.count),
			reset_at: counter.window_start + self.window(),
		}
	}
}

/// Client key for rate limiting: forwarded-for header when present, else
/// the peer socket address, else a shared bucket
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
	S: Send + Sync,
{
	type Rejection = Infallible;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(forwarded) = parts
			.headers
			.get("x-forwarded-for")
			.and_then(|value| value.to_str().ok())
			.and_then(|value| value.split(',').next())
		{
			let forwarded = forwarded.trim();
			if !forwarded.is_empty() {
				return Ok(ClientIp(forwarded.to_string()));
			}
		}

		if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
			return Ok(ClientIp(addr.ip().to_string()));
		}

		Ok(ClientIp("unknown".to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn policy(max_requests: u32) -> RateLimitPolicy {
		RateLimitPolicy {
			enabled: true,
			max_requests,
			window_seconds: 60,
		}
	}

	#[test]
	fn test_requests_within_limit_are_allowed() {
		let limiter = RateLimiter::new(policy(3));
		for _ in 0..3 {
			assert!(limiter.check("10.0.0.1").allowed);
		}
		assert!(!limiter.check("10.0.0.1").allowed);
	}

	#[test]
	fn test_clients_are_limited_independently() {
		let limiter = RateLimiter::new(policy(1));
		assert!(limiter.check("10.0.0.1").allowed);
		assert!(!limiter.check("10.0.0.1").allowed);
		assert!(limiter.check("10.0.0.2").allowed);
	}

	#[test]
	fn test_disabled_policy_never_limits() {
		let limiter = RateLimiter::new(RateLimitPolicy {
			enabled: false,
			max_requests: 1,
			window_seconds: 60,
		});
		for _ in 0..10 {
			assert!(limiter.check("10.0.0.1").allowed);
		}
	}

	#[test]
	fn test_remaining_counts_down() {
		let limiter = RateLimiter::new(policy(2));
		assert_eq!(limiter.check("10.0.0.1").remaining, 1);
		assert_eq!(limiter.check("10.0.0.1").remaining, 0);
	}
}
