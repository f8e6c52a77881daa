//! Coverline Configuration
//!
//! Configuration management for the Coverline quote aggregator.

pub mod configurable_value;
pub mod loader;
pub mod settings;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError};
pub use loader::load_config;
pub use settings::{
	CacheSettings, EnvironmentProfile, EnvironmentSettings, LogFormat, LoggingSettings,
	ProviderSettings, RateLimitSettings, ServerSettings, Settings,
};
