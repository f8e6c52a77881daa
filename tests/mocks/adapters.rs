//! Mock provider adapters for integration testing
//!
//! Configurable adapters covering the behaviors the orchestrator has to
//! tolerate: fixed quote sets, hard failures, and slow responses.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use coverline::{AdapterError, ProviderAdapter, ProviderRuntimeConfig, Quote};
use coverline_types::adapters::{AdapterResult, ProviderInfo};
use coverline_types::test_utils;
use coverline_types::QuoteSource;

/// Mock adapter with a fixed quote set and configurable failure behavior
#[derive(Debug, Clone)]
pub struct MockAdapter {
	info: ProviderInfo,
	source: QuoteSource,
	quotes: Vec<Quote>,
	should_fail: bool,
	response_delay_ms: u64,
	call_tracker: Arc<AtomicUsize>,
}

impl MockAdapter {
	/// Adapter that returns the given quotes on every call
	pub fn serving(source: QuoteSource, quotes: Vec<Quote>) -> Self {
		Self::with_config(source, quotes, false, 0)
	}

	/// Adapter whose every call fails with a 503
	pub fn failing(source: QuoteSource) -> Self {
		Self::with_config(source, Vec::new(), true, 0)
	}

	/// Adapter that sleeps before answering, for timeout testing
	pub fn slow(source: QuoteSource, quotes: Vec<Quote>, response_delay_ms: u64) -> Self {
		Self::with_config(source, quotes, false, response_delay_ms)
	}

	pub fn with_config(
		source: QuoteSource,
		quotes: Vec<Quote>,
		should_fail: bool,
		response_delay_ms: u64,
	) -> Self {
		Self {
			info: ProviderInfo::new(
				source.as_str(),
				format!("{} Mock", source.as_str()),
				"Mock adapter for integration tests",
				"1.0.0",
			),
			source,
			quotes,
			should_fail,
			response_delay_ms,
			call_tracker: Arc::new(AtomicUsize::new(0)),
		}
	}

	/// Number of get_quotes calls this adapter has received
	pub fn call_count(&self) -> usize {
		self.call_tracker.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
	fn provider_info(&self) -> &ProviderInfo {
		&self.info
	}

	fn source(&self) -> QuoteSource {
		self.source
	}

	async fn get_quotes(
		&self,
		_request: &coverline::QuoteRequest,
		_config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>> {
		self.call_tracker.fetch_add(1, Ordering::SeqCst);

		if self.response_delay_ms > 0 {
			tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;
		}

		if self.should_fail {
			return Err(AdapterError::from_http_failure(503));
		}

		Ok(self.quotes.clone())
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		Ok(!self.should_fail)
	}
}

/// Two quotes per provider, distinct carriers, in a realistic premium spread
pub fn two_quotes(source: QuoteSource, carrier_a: &str, annual_a: f64, carrier_b: &str, annual_b: f64) -> Vec<Quote> {
	vec![
		test_utils::quote(carrier_a, annual_a, source),
		test_utils::quote(carrier_b, annual_b, source),
	]
}
