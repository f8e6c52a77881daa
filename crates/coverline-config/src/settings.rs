//! Configuration settings structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use coverline_types::constants::{
	DEFAULT_CACHE_SWEEP_INTERVAL_SECONDS, DEFAULT_CACHE_TTL_SECONDS,
	DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_RATE_LIMIT_MAX_REQUESTS, RATE_LIMIT_WINDOW_SECONDS,
};
use coverline_types::ProviderRuntimeConfig;

use crate::configurable_value::ConfigurableValue;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: HashMap<String, ProviderSettings>,
	pub cache: CacheSettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Individual provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderSettings {
	pub endpoint: String,
	pub timeout_ms: u64,
	pub enabled: bool,
	/// Credential for the live call; without one the adapter serves its
	/// deterministic fallback data
	pub api_key: Option<ConfigurableValue>,
}

/// Response cache configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
	/// Durable backend; absent means in-process cache only
	pub redis_url: Option<String>,
	pub ttl_seconds: u64,
	pub sweep_interval_seconds: u64,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub debug: bool,
	pub rate_limiting: RateLimitSettings,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Rate limiting for the generate endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RateLimitSettings {
	pub enabled: bool,
	pub max_requests: u32,
	pub window_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

fn default_provider(endpoint: &str, api_key_var: &str) -> ProviderSettings {
	ProviderSettings {
		endpoint: endpoint.to_string(),
		timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
		enabled: true,
		api_key: Some(ConfigurableValue::from_env(api_key_var)),
	}
}

impl Default for Settings {
	fn default() -> Self {
		let mut providers = HashMap::new();
		providers.insert(
			"apex-rate".to_string(),
			default_provider("https://api.apexrate.example.com", "APEXRATE_API_KEY"),
		);
		providers.insert(
			"sureline".to_string(),
			default_provider("https://partners.sureline.example.com", "SURELINE_API_KEY"),
		);
		providers.insert(
			"quantum-quote".to_string(),
			default_provider("https://api.quantumquote.example.com", "QUANTUMQUOTE_API_KEY"),
		);

		Self {
			server: ServerSettings {
				host: "0.0.0.0".to_string(),
				port: 3000,
			},
			providers,
			cache: CacheSettings {
				redis_url: None,
				ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
				sweep_interval_seconds: DEFAULT_CACHE_SWEEP_INTERVAL_SECONDS,
			},
			environment: EnvironmentSettings {
				profile: EnvironmentProfile::Development,
				debug: true,
				rate_limiting: RateLimitSettings {
					enabled: true,
					max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
					window_seconds: RATE_LIMIT_WINDOW_SECONDS,
				},
			},
			logging: LoggingSettings {
				level: "info".to_string(),
				format: LogFormat::Pretty,
			},
		}
	}
}

impl Settings {
	/// Server bind address
	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Check if running in production
	pub fn is_production(&self) -> bool {
		self.environment.profile == EnvironmentProfile::Production
	}

	/// Check if debug mode is enabled
	pub fn is_debug(&self) -> bool {
		self.environment.debug && !self.is_production()
	}

	/// Resolve per-provider runtime configurations
	///
	/// Live calls are only enabled under the production profile; an
	/// unresolvable credential downgrades that provider to fallback data
	/// rather than failing startup.
	pub fn provider_runtime_configs(&self) -> HashMap<String, ProviderRuntimeConfig> {
		self.providers
			.iter()
			.filter(|(_, settings)| settings.enabled)
			.map(|(provider_id, settings)| {
				let api_key = settings
					.api_key
					.as_ref()
					.and_then(|value| value.resolve_secret().ok());

				(
					provider_id.clone(),
					ProviderRuntimeConfig {
						provider_id: provider_id.clone(),
						endpoint: settings.endpoint.clone(),
						api_key,
						timeout_ms: settings.timeout_ms,
						live_mode: self.is_production(),
					},
				)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_cover_all_three_providers() {
		let settings = Settings::default();
		assert_eq!(settings.providers.len(), 3);
		assert!(settings.providers.contains_key("apex-rate"));
		assert!(settings.providers.contains_key("sureline"));
		assert!(settings.providers.contains_key("quantum-quote"));
		assert!(!settings.is_production());
	}

	#[test]
	fn test_development_profile_never_enables_live_calls() {
		let settings = Settings::default();
		let configs = settings.provider_runtime_configs();
		assert!(configs.values().all(|config| !config.live_mode));
		assert!(configs.values().all(|config| !config.use_live_call()));
	}

	#[test]
	fn test_production_profile_enables_live_mode() {
		let mut settings = Settings::default();
		settings.environment.profile = EnvironmentProfile::Production;
		settings.providers.get_mut("apex-rate").unwrap().api_key =
			Some(ConfigurableValue::from_plain("apx-live-key"));

		let configs = settings.provider_runtime_configs();
		assert!(configs["apex-rate"].use_live_call());
		// Providers without a resolvable credential stay on fallback data
		assert!(!configs["sureline"].use_live_call());
	}

	#[test]
	fn test_disabled_provider_is_excluded() {
		let mut settings = Settings::default();
		settings.providers.get_mut("sureline").unwrap().enabled = false;

		let configs = settings.provider_runtime_configs();
		assert_eq!(configs.len(), 2);
		assert!(!configs.contains_key("sureline"));
	}

	#[test]
	fn test_bind_address() {
		let settings = Settings::default();
		assert_eq!(settings.bind_address(), "0.0.0.0:3000");
	}
}
