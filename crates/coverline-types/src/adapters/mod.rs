//! Provider adapter contract and configuration

pub mod errors;
pub mod traits;

pub use errors::{AdapterError, AdapterResult};
pub use traits::ProviderAdapter;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROVIDER_TIMEOUT_MS;
use crate::models::SecretString;

/// Static descriptive metadata for a provider adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
	pub provider_id: String,
	pub name: String,
	pub description: String,
	pub version: String,
}

impl ProviderInfo {
	pub fn new(
		provider_id: impl Into<String>,
		name: impl Into<String>,
		description: impl Into<String>,
		version: impl Into<String>,
	) -> Self {
		Self {
			provider_id: provider_id.into(),
			name: name.into(),
			description: description.into(),
			version: version.into(),
		}
	}
}

/// Per-call runtime configuration for one provider
///
/// Carries the endpoint, optional credential, and timeout the orchestrator
/// resolved for this provider. The credential decides the live-vs-fallback
/// branch inside each adapter.
#[derive(Debug, Clone)]
pub struct ProviderRuntimeConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub api_key: Option<SecretString>,
	pub timeout_ms: u64,
	/// True only under the production profile; non-production always uses
	/// deterministic fallback data
	pub live_mode: bool,
}

impl ProviderRuntimeConfig {
	/// Offline config with no credential; adapters will serve fallback data
	pub fn offline(provider_id: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			endpoint: String::new(),
			api_key: None,
			timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
			live_mode: false,
		}
	}

	/// Whether a credential is configured for the live call
	pub fn has_credentials(&self) -> bool {
		self.api_key.as_ref().is_some_and(|key| !key.is_empty())
	}

	/// Whether the adapter should attempt the live provider call at all
	pub fn use_live_call(&self) -> bool {
		self.live_mode && self.has_credentials()
	}
}
