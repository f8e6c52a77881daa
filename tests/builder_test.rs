//! AggregatorBuilder wiring tests

mod mocks;

use std::sync::Arc;

use coverline::{AggregatorBuilder, Settings};
use coverline_types::test_utils;
use coverline_types::QuoteSource;

use crate::mocks::adapters::MockAdapter;

#[tokio::test]
async fn test_default_builder_wires_three_providers() {
	let (_, state) = AggregatorBuilder::new()
		.start()
		.await
		.expect("builder should start with defaults");

	assert_eq!(state.aggregator_service.providers_queried(), 3);
	assert!(!state.cache.is_degraded());
}

#[tokio::test]
async fn test_custom_adapter_replaces_default_provider_set() {
	let adapter = Arc::new(MockAdapter::serving(
		QuoteSource::ApexRate,
		vec![test_utils::quote("Sentinel Mutual", 1520.0, QuoteSource::ApexRate)],
	));

	let (_, state) = AggregatorBuilder::new()
		.with_adapter(adapter)
		.start()
		.await
		.expect("builder should start with a custom adapter");

	assert_eq!(state.aggregator_service.providers_queried(), 1);
}

#[tokio::test]
async fn test_builder_keeps_provided_settings() {
	let mut settings = Settings::default();
	settings.server.port = 8099;

	let builder = AggregatorBuilder::new().with_settings(settings);
	assert_eq!(
		builder.settings().map(|s| s.bind_address()),
		Some("0.0.0.0:8099".to_string())
	);
}

#[tokio::test]
async fn test_builder_without_redis_serves_from_memory_cache() {
	let (_, state) = AggregatorBuilder::new()
		.with_settings(Settings::default())
		.start()
		.await
		.expect("builder should start without a durable cache tier");

	// No redis_url configured; the in-process tier carries the cache alone
	// without entering degraded mode
	assert!(!state.cache.is_degraded());
}
