//! Coverline Aggregator Library
//!
//! An aggregation and ranking service for auto insurance quotes. One request
//! fans out to every configured rating provider concurrently, and the union
//! of their quotes comes back scored, ranked, badged, and cached.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

// Core domain types - the most commonly used types
pub use coverline_types::{
	// External dependencies for convenience
	chrono,
	serde_json,
	// Error types
	AdapterError,
	AggregationError,
	Coverage,
	Driver,
	HealthStatus,
	MetricsSnapshot,
	// Adapter seam
	ProviderAdapter,
	ProviderRuntimeConfig,
	// Primary domain entities
	Quote,
	QuoteRequest,
	QuoteResponse,
	Vehicle,
};

// Service layer
pub use coverline_service::{AggregatorService, MetricsCollector, QuoteService};

// Storage layer
pub use coverline_storage::{
	fingerprint, CacheBackend, CacheService, MemoryStore, RedisCache, Storage, StorageError,
	StorageResult,
};

// API layer
pub use coverline_api::{create_router, AppState, RateLimitPolicy, RateLimiter};

// Adapters
pub use coverline_adapters::{
	AdapterRegistry, ApexRateAdapter, QuantumQuoteAdapter, SurelineAdapter,
};

// Config
pub use coverline_config::{load_config, LogFormat, Settings};

/// Builder pattern for configuring the aggregator
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	store: MemoryStore,
	adapter_registry: Option<AdapterRegistry>,
}

impl Default for AggregatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AggregatorBuilder {
	/// Create a new aggregator builder with default memory storage
	pub fn new() -> Self {
		Self {
			settings: None,
			store: MemoryStore::new(),
			adapter_registry: None,
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register a custom provider adapter
	///
	/// Registering any adapter replaces the default provider set, so a
	/// caller that wants the standard providers plus one extra must register
	/// all of them explicitly.
	pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		let mut registry = self.adapter_registry.take().unwrap_or_default();
		registry.register(adapter);
		self.adapter_registry = Some(registry);
		self
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.logging.level));

		match settings.logging.format {
			LogFormat::Json => {
				tracing_subscriber::fmt()
					.json()
					.with_env_filter(env_filter)
					.init();
			},
			LogFormat::Pretty => {
				tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter)
					.init();
			},
			LogFormat::Compact => {
				tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter)
					.init();
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}",
			settings.logging.level, settings.logging.format
		);

		Ok(())
	}

	/// Wire all services together and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();

		// Use the custom registry or fall back to the three standard providers
		let adapter_registry = Arc::new(match self.adapter_registry {
			Some(registry) => registry,
			None => AdapterRegistry::with_defaults()?,
		});
		info!(
			"Successfully initialized with {} provider adapter(s)",
			adapter_registry.len()
		);

		let memory = Arc::new(self.store.clone());
		let _sweep =
			memory.start_ttl_sweep(Duration::from_secs(settings.cache.sweep_interval_seconds));

		// A durable cache tier is optional; a failed connection downgrades to
		// the in-process tier instead of aborting startup
		let durable: Option<Arc<dyn CacheBackend>> = match &settings.cache.redis_url {
			Some(url) => match RedisCache::connect(url).await {
				Ok(redis) => {
					info!("Durable cache tier connected");
					Some(Arc::new(redis))
				},
				Err(e) => {
					warn!(
						"Durable cache tier unavailable ({}), continuing in-memory only",
						e
					);
					None
				},
			},
			None => None,
		};
		let cache = Arc::new(
			CacheService::new(durable, Arc::clone(&memory))
				.with_ttl(Duration::from_secs(settings.cache.ttl_seconds)),
		);

		let storage: Arc<dyn Storage> = Arc::new(self.store.clone());
		let metrics = Arc::new(MetricsCollector::new());

		let aggregator_service = Arc::new(AggregatorService::new(
			Arc::clone(&adapter_registry),
			settings.provider_runtime_configs(),
			Arc::clone(&cache),
			Arc::clone(&storage),
			Arc::clone(&metrics),
		));
		let quote_service = Arc::new(QuoteService::new(Arc::clone(&storage)));

		let rate_cfg = &settings.environment.rate_limiting;
		let rate_limiter = Arc::new(RateLimiter::new(RateLimitPolicy {
			enabled: rate_cfg.enabled,
			max_requests: rate_cfg.max_requests,
			window_seconds: rate_cfg.window_seconds,
		}));

		let app_state = AppState {
			aggregator_service,
			quote_service,
			storage,
			cache,
			metrics,
			rate_limiter,
		};

		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Start the complete server with all defaults and setup
	///
	/// This method handles everything needed to run the server, including
	/// loading configuration, initializing tracing, starting the cache TTL
	/// sweep, and binding and serving the application.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		// Use provided settings or load from config with defaults
		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config().unwrap_or_default(),
		};

		self.init_tracing_from_settings(&settings)?;

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		let enabled_providers: Vec<_> = settings
			.providers
			.iter()
			.filter(|(_, p)| p.enabled)
			.collect();
		info!("Enabled providers: {}", enabled_providers.len());
		for (id, provider) in &enabled_providers {
			info!(
				"  - {}: {} ({}ms timeout)",
				id, provider.endpoint, provider.timeout_ms
			);
		}

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{}': {}", bind_addr, e))?;

		self.settings = Some(settings);
		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;

		info!("Coverline aggregator listening on {}", bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  GET  /api/metrics");
		info!("  POST /api/quote/generate");
		info!("  GET  /api/quote/{{quoteId}}");
		info!("  POST /api/quote/bind");
		info!("  POST /api/quote/compare");
		info!("  POST /api/quote/save");
		info!("  GET  /api/quote/saved/{{token}}");

		axum::serve(
			listener,
			app.into_make_service_with_connect_info::<SocketAddr>(),
		)
		.await?;

		Ok(())
	}
}
