use std::sync::Arc;

use coverline_service::{AggregatorService, MetricsCollector, QuoteService};
use coverline_storage::{CacheService, Storage};

use crate::rate_limit::RateLimiter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub aggregator_service: Arc<AggregatorService>,
	pub quote_service: Arc<QuoteService>,
	pub storage: Arc<dyn Storage>,
	pub cache: Arc<CacheService>,
	pub metrics: Arc<MetricsCollector>,
	pub rate_limiter: Arc<RateLimiter>,
}
