//! Core aggregation orchestration
//!
//! One request flows: validate, check the response cache, fan out to every
//! registered provider concurrently, wait for all to settle, score and rank
//! the union, write the cache, record metrics. A single provider failure is
//! isolated; only total failure escalates to the caller.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};
use uuid::Uuid;

use coverline_adapters::AdapterRegistry;
use coverline_storage::{fingerprint, CacheService, Storage};
use coverline_types::{
	AggregationError, AggregationResult, AggregationStatistics, ProviderRuntimeConfig, Quote,
	QuoteRequest, QuoteResponse, ResponseMetadata,
};

use crate::metrics::MetricsCollector;
use crate::scoring;

/// Orchestrates quote aggregation across all registered providers
pub struct AggregatorService {
	registry: Arc<AdapterRegistry>,
	provider_configs: HashMap<String, ProviderRuntimeConfig>,
	cache: Arc<CacheService>,
	store: Arc<dyn Storage>,
	metrics: Arc<MetricsCollector>,
}

impl AggregatorService {
	pub fn new(
		registry: Arc<AdapterRegistry>,
		provider_configs: HashMap<String, ProviderRuntimeConfig>,
		cache: Arc<CacheService>,
		store: Arc<dyn Storage>,
		metrics: Arc<MetricsCollector>,
	) -> Self {
		Self {
			registry,
			provider_configs,
			cache,
			store,
			metrics,
		}
	}

	fn config_for(&self, provider_id: &str) -> ProviderRuntimeConfig {
		self.provider_configs
			.get(provider_id)
			.cloned()
			.unwrap_or_else(|| ProviderRuntimeConfig::offline(provider_id))
	}

	/// Run the full aggregation pipeline for one request
	pub async fn generate_quotes(
		&self,
		request: QuoteRequest,
		force_refresh: bool,
	) -> AggregationResult<QuoteResponse> {
		let started = Instant::now();

		if let Err(e) = request.validate() {
			self.metrics.record_error(e.to_string());
			return Err(e.into());
		}

		let cache_key = fingerprint(&request);
		if !force_refresh {
			if let Some(mut cached) = self.cache.get_response(&cache_key).await {
				info!(
					"Cache hit for session {} (fingerprint {})",
					request.session_id, cache_key
				);
				self.metrics.record_cache_hit();
				cached.metadata.cached = true;
				cached.metadata.session_id = request.session_id;
				cached.metadata.request_id = Uuid::new_v4().to_string();
				cached.metadata.duration_ms = started.elapsed().as_millis() as u64;
				return Ok(cached);
			}
		}

		let (quotes_by_source, providers_responded) = self.fan_out(&request).await;
		let providers_queried = self.registry.len() as u32;

		if quotes_by_source.iter().all(|quotes| quotes.is_empty()) {
			warn!(
				"All {} providers failed or returned no quotes for session {}",
				providers_queried, request.session_id
			);
			self.metrics
				.record_error(AggregationError::NoQuotesAvailable.to_string());
			return Err(AggregationError::NoQuotesAvailable);
		}

		let scored = scoring::rank_and_analyze(quotes_by_source, &request);
		let insights = scoring::build_insights(&scored, &request);
		let statistics = Self::statistics(&scored, providers_queried, providers_responded);

		for quote in &scored {
			if let Err(e) = self.store.add_quote(quote.clone()).await {
				warn!("Failed to store quote {}: {}", quote.quote_id, e);
			}
		}

		let duration_ms = started.elapsed().as_millis() as u64;
		let response = QuoteResponse {
			success: true,
			quotes: scored,
			insights,
			statistics,
			metadata: ResponseMetadata {
				session_id: request.session_id.clone(),
				request_id: Uuid::new_v4().to_string(),
				cached: false,
				generated_at: chrono::Utc::now(),
				duration_ms,
			},
		};

		// Exactly one cache write per successful aggregation; a write failure
		// is logged, never surfaced
		if let Err(e) = self.cache.set_response(&cache_key, &response).await {
			warn!("Cache write failed for fingerprint {}: {}", cache_key, e);
		}

		self.metrics.record_request_success(
			duration_ms,
			response.quotes.len(),
			providers_responded,
		);
		info!(
			"Aggregated {} quotes from {}/{} providers in {}ms",
			response.quotes.len(),
			providers_responded,
			providers_queried,
			duration_ms
		);

		Ok(response)
	}

	/// Query every provider concurrently and wait for all to settle
	///
	/// Returns one slot per provider in registration order (failed providers
	/// contribute an empty slot) and the count of providers that responded.
	async fn fan_out(&self, request: &QuoteRequest) -> (Vec<Vec<Quote>>, u32) {
		let tasks = self.registry.all().iter().map(|adapter| {
			let adapter = Arc::clone(adapter);
			let request = request.clone();
			let config = self.config_for(adapter.id());
			let metrics = Arc::clone(&self.metrics);

			tokio::spawn(async move {
				debug!("Querying provider {}", adapter.id());
				let call_started = Instant::now();

				let outcome = timeout(
					Duration::from_millis(config.timeout_ms),
					adapter.get_quotes(&request, &config),
				)
				.await;
				let latency_ms = call_started.elapsed().as_millis() as u64;

				match outcome {
					Ok(Ok(quotes)) => {
						metrics.record_provider_result(adapter.id(), true, latency_ms);
						info!(
							"Provider {} returned {} quotes in {}ms",
							adapter.id(),
							quotes.len(),
							latency_ms
						);
						Some(quotes)
					},
					Ok(Err(e)) => {
						metrics.record_provider_result(adapter.id(), false, latency_ms);
						warn!("Provider {} failed: {}", adapter.id(), e);
						None
					},
					Err(_) => {
						metrics.record_provider_result(adapter.id(), false, latency_ms);
						warn!(
							"Provider {} timed out after {}ms",
							adapter.id(),
							config.timeout_ms
						);
						None
					},
				}
			})
		});

		let settled: Vec<Option<Vec<Quote>>> = join_all(tasks)
			.await
			.into_iter()
			.map(|joined| joined.ok().flatten())
			.collect();

		let providers_responded = settled.iter().filter(|slot| slot.is_some()).count() as u32;
		let quotes_by_source = settled
			.into_iter()
			.map(Option::unwrap_or_default)
			.collect();

		(quotes_by_source, providers_responded)
	}

	fn statistics(
		quotes: &[Quote],
		providers_queried: u32,
		providers_responded: u32,
	) -> AggregationStatistics {
		let premiums: Vec<f64> = quotes.iter().map(|q| q.premium.annual).collect();
		let lowest = premiums.iter().copied().fold(f64::INFINITY, f64::min);
		let highest = premiums.iter().copied().fold(f64::NEG_INFINITY, f64::max);
		let average = if premiums.is_empty() {
			0.0
		} else {
			premiums.iter().sum::<f64>() / premiums.len() as f64
		};

		AggregationStatistics {
			total_quotes: quotes.len(),
			average_premium: (average * 100.0).round() / 100.0,
			lowest_premium: lowest,
			highest_premium: highest,
			potential_savings: ((highest - lowest) * 100.0).round() / 100.0,
			providers_queried,
			providers_responded,
		}
	}

	/// Health check every provider with its runtime configuration
	pub async fn health_check_providers(&self) -> HashMap<String, bool> {
		let mut results = HashMap::new();

		for adapter in self.registry.all() {
			let config = self.config_for(adapter.id());
			let healthy = adapter
				.health_check(&config)
				.await
				.unwrap_or(false);
			results.insert(adapter.id().to_string(), healthy);
		}

		results
	}

	pub fn cache(&self) -> &CacheService {
		&self.cache
	}

	pub fn metrics(&self) -> &MetricsCollector {
		&self.metrics
	}

	pub fn providers_queried(&self) -> u32 {
		self.registry.len() as u32
	}
}
