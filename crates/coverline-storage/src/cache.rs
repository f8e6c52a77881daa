//! Response cache service with fingerprint derivation and transparent
//! backend degradation

use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use coverline_types::constants::DEFAULT_CACHE_TTL_SECONDS;
use coverline_types::{QuoteRequest, QuoteResponse};

use crate::memory_store::MemoryStore;
use crate::traits::{CacheBackend, StorageResult};

/// Derive the content-addressable cache key for a request
///
/// The hash covers the rating-relevant parts of the request (vehicles,
/// drivers, coverage) and excludes the session id, so identical risk
/// profiles share a cache entry. Serialization goes through
/// `serde_json::Value`, whose object keys are ordered, so field order can
/// never affect the fingerprint.
pub fn fingerprint(request: &QuoteRequest) -> String {
	let canonical = serde_json::json!({
		"vehicleData": request.vehicle_data,
		"driverData": request.driver_data,
		"coverage": request.coverage,
	});

	let mut hasher = Sha256::new();
	hasher.update(canonical.to_string().as_bytes());
	format!("{:x}", hasher.finalize())
}

/// Response cache that prefers a durable backend and degrades to the
/// in-process map on any backend failure
///
/// Degradation is one-way for the process lifetime: once a durable
/// operation fails, all subsequent traffic uses the in-process map so
/// callers never pay for repeated probing of a dead backend. Callers only
/// observe the difference through logs and the degraded flag.
pub struct CacheService {
	durable: Option<Arc<dyn CacheBackend>>,
	memory: Arc<MemoryStore>,
	degraded: AtomicBool,
	default_ttl: Duration,
}

impl CacheService {
	/// Build a cache service over an optional durable backend and the
	/// in-process fallback store
	pub fn new(durable: Option<Arc<dyn CacheBackend>>, memory: Arc<MemoryStore>) -> Self {
		Self {
			durable,
			memory,
			degraded: AtomicBool::new(false),
			default_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
		}
	}

	/// In-process-only cache service
	pub fn in_memory(memory: Arc<MemoryStore>) -> Self {
		Self::new(None, memory)
	}

	/// Override the default TTL applied by `set_response`
	pub fn with_ttl(mut self, ttl: Duration) -> Self {
		self.default_ttl = ttl;
		self
	}

	pub fn default_ttl(&self) -> Duration {
		self.default_ttl
	}

	/// Whether the durable backend has been abandoned for this process
	pub fn is_degraded(&self) -> bool {
		self.degraded.load(Ordering::Relaxed)
	}

	fn active_backend(&self) -> &dyn CacheBackend {
		match &self.durable {
			Some(durable) if !self.is_degraded() => durable.as_ref(),
			_ => self.memory.as_ref(),
		}
	}

	fn degrade(&self, operation: &str, error: impl std::fmt::Display) {
		if !self.degraded.swap(true, Ordering::Relaxed) {
			warn!(
				"Cache backend {} failed ({}); degrading to in-process cache",
				operation, error
			);
		}
	}

	/// Fetch a cached response by fingerprint; backend failures degrade and
	/// report a miss rather than surfacing to the caller
	pub async fn get_response(&self, key: &str) -> Option<QuoteResponse> {
		let payload = match self.active_backend().get(key).await {
			Ok(payload) => payload,
			Err(e) => {
				self.degrade("get", e);
				match self.memory.get(key).await {
					Ok(payload) => payload,
					Err(_) => None,
				}
			},
		};

		let payload = payload?;
		match serde_json::from_str::<QuoteResponse>(&payload) {
			Ok(response) => Some(response),
			Err(e) => {
				// A corrupt entry is dropped rather than served
				warn!("Discarding undecodable cache entry {}: {}", key, e);
				let _ = self.remove(key).await;
				None
			},
		}
	}

	/// Store a response under its fingerprint with the default TTL
	pub async fn set_response(&self, key: &str, response: &QuoteResponse) -> StorageResult<()> {
		let payload = serde_json::to_string(response)?;

		if let Err(e) = self
			.active_backend()
			.set(key, payload.clone(), self.default_ttl)
			.await
		{
			self.degrade("set", e);
			self.memory.set(key, payload, self.default_ttl).await?;
		}

		debug!("Cached response under fingerprint {}", key);
		Ok(())
	}

	/// Remove a cached response
	pub async fn remove(&self, key: &str) -> StorageResult<bool> {
		match self.active_backend().remove(key).await {
			Ok(removed) => Ok(removed),
			Err(e) => {
				self.degrade("remove", e);
				self.memory.remove(key).await
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use coverline_types::test_utils;
	use coverline_types::{
		AggregationStatistics, QuoteInsights, QuoteSource, Recommendation, ResponseMetadata,
		RiskAssessment, RiskLevel, SavingsOpportunity,
	};

	use crate::traits::StorageError;

	fn sample_response() -> QuoteResponse {
		let quote = test_utils::quote("Sentinel Mutual", 1200.0, QuoteSource::ApexRate);
		QuoteResponse {
			success: true,
			quotes: vec![quote],
			insights: QuoteInsights {
				summary: "1 quote found".to_string(),
				recommendations: vec![Recommendation {
					rank: 1,
					carrier: "Sentinel Mutual".to_string(),
					reason: "Best overall value".to_string(),
				}],
				savings_opportunity: SavingsOpportunity {
					amount: 0.0,
					percentage: 0.0,
					message: "Single quote".to_string(),
				},
				risk_assessment: RiskAssessment {
					score: 45,
					level: RiskLevel::Standard,
					factors: vec![],
				},
				market_analysis: "At market".to_string(),
			},
			statistics: AggregationStatistics {
				total_quotes: 1,
				average_premium: 1200.0,
				lowest_premium: 1200.0,
				highest_premium: 1200.0,
				potential_savings: 0.0,
				providers_queried: 3,
				providers_responded: 1,
			},
			metadata: ResponseMetadata {
				session_id: "sess-test-0001".to_string(),
				request_id: "req-1".to_string(),
				cached: false,
				generated_at: chrono::Utc::now(),
				duration_ms: 42,
			},
		}
	}

	/// Backend that fails every operation, for degradation tests
	#[derive(Debug)]
	struct BrokenBackend;

	#[async_trait]
	impl CacheBackend for BrokenBackend {
		async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
			Err(StorageError::Backend("connection refused".to_string()))
		}

		async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> StorageResult<()> {
			Err(StorageError::Backend("connection refused".to_string()))
		}

		async fn remove(&self, _key: &str) -> StorageResult<bool> {
			Err(StorageError::Backend("connection refused".to_string()))
		}

		async fn health_check(&self) -> StorageResult<bool> {
			Ok(false)
		}
	}

	#[test]
	fn test_fingerprint_is_stable() {
		let request = test_utils::standard_request();
		assert_eq!(fingerprint(&request), fingerprint(&request.clone()));
	}

	#[test]
	fn test_fingerprint_ignores_session_id() {
		let request = test_utils::standard_request();
		let mut other_session = request.clone();
		other_session.session_id = "sess-different".to_string();
		assert_eq!(fingerprint(&request), fingerprint(&other_session));
	}

	#[test]
	fn test_fingerprint_changes_with_content() {
		let request = test_utils::standard_request();
		let mut changed = request.clone();
		changed.coverage.liability = "250/500/100".to_string();
		assert_ne!(fingerprint(&request), fingerprint(&changed));
	}

	#[tokio::test]
	async fn test_roundtrip_through_memory() {
		let cache = CacheService::in_memory(Arc::new(MemoryStore::new()));
		let response = sample_response();
		let key = "fp-1";

		assert!(cache.get_response(key).await.is_none());
		cache.set_response(key, &response).await.unwrap();

		let loaded = cache.get_response(key).await.unwrap();
		assert_eq!(loaded.quotes, response.quotes);
		assert!(!cache.is_degraded());
	}

	#[tokio::test]
	async fn test_broken_durable_backend_degrades_transparently() {
		let cache = CacheService::new(
			Some(Arc::new(BrokenBackend)),
			Arc::new(MemoryStore::new()),
		);
		let response = sample_response();

		cache.set_response("fp-1", &response).await.unwrap();
		assert!(cache.is_degraded());

		// Subsequent reads come from the in-process map
		let loaded = cache.get_response("fp-1").await.unwrap();
		assert_eq!(loaded.statistics.total_quotes, 1);
	}
}
