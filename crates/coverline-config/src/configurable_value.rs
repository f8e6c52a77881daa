//! Values resolvable from the environment or inline configuration
//!
//! Provider API keys should come from the environment in production; plain
//! values exist for local development and tests.

use coverline_types::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' is not set")]
	EnvVarNotSet(String),
}

/// A config value that is either inline or resolved from an env var
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConfigurableValue {
	/// Resolve from the named environment variable at startup
	Env(String),
	/// Use the inline value as-is
	Plain(String),
}

impl ConfigurableValue {
	pub fn from_env(var_name: impl Into<String>) -> Self {
		Self::Env(var_name.into())
	}

	pub fn from_plain(value: impl Into<String>) -> Self {
		Self::Plain(value.into())
	}

	/// Resolve to the configured value
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self {
			Self::Env(var_name) => std::env::var(var_name)
				.map_err(|_| ConfigurableValueError::EnvVarNotSet(var_name.clone())),
			Self::Plain(value) => Ok(value.clone()),
		}
	}

	/// Resolve directly into a `SecretString` for credential handling
	pub fn resolve_secret(&self) -> Result<SecretString, ConfigurableValueError> {
		self.resolve().map(SecretString::from)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_plain_value_resolves() {
		let value = ConfigurableValue::from_plain("apx-dev-key");
		assert_eq!(value.resolve().unwrap(), "apx-dev-key");
	}

	#[test]
	fn test_missing_env_var_errors() {
		let value = ConfigurableValue::from_env("COVERLINE_TEST_UNSET_VAR");
		assert!(matches!(
			value.resolve(),
			Err(ConfigurableValueError::EnvVarNotSet(_))
		));
	}

	#[test]
	fn test_deserializes_from_tagged_form() {
		let value: ConfigurableValue =
			serde_json::from_str(r#"{"type": "plain", "value": "k"}"#).unwrap();
		assert_eq!(value.resolve().unwrap(), "k");
	}
}
