//! Configuration loading utilities

use config::{Config, ConfigError, Environment, File};

use crate::Settings;

/// Load configuration from the config file and environment overrides
///
/// Reads `config/config.{toml,yaml,json}` when present, then applies
/// `COVERLINE__`-prefixed environment variables on top (for example
/// `COVERLINE__SERVER__PORT=8080`). Missing sources fall back to defaults.
pub fn load_config() -> Result<Settings, ConfigError> {
	let config = Config::builder()
		.add_source(File::with_name("config/config").required(false))
		.add_source(Environment::with_prefix("COVERLINE").separator("__"))
		.build()?;

	config.try_deserialize()
}
