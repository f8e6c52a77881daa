//! Core adapter trait for provider implementations

use async_trait::async_trait;
use std::fmt::Debug;

use super::{AdapterResult, ProviderInfo, ProviderRuntimeConfig};
use crate::quotes::{Quote, QuoteRequest, QuoteSource};

/// Core trait all provider adapters implement
///
/// An adapter translates the canonical request into one provider's payload,
/// issues the call, and translates the provider response back into canonical
/// quotes. `get_quotes` is all-or-nothing: it either returns a full sequence
/// (possibly empty) or fails as a unit, never partially.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
	/// Static descriptive metadata for this adapter
	fn provider_info(&self) -> &ProviderInfo;

	/// Provider id (for registration and config matching)
	fn id(&self) -> &str {
		&self.provider_info().provider_id
	}

	/// Human-readable name for this adapter
	fn name(&self) -> &str {
		&self.provider_info().name
	}

	/// Source tag stamped on every quote this adapter produces
	fn source(&self) -> QuoteSource;

	/// Fetch quotes for the request using runtime configuration
	///
	/// Without credentials (or outside the production profile) this returns
	/// the adapter's deterministic fallback quote set instead of calling the
	/// provider; with credentials, live-call failures propagate.
	async fn get_quotes(
		&self,
		request: &QuoteRequest,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Vec<Quote>>;

	/// Health check for the provider using runtime configuration
	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool>;
}
