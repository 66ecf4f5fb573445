//! Registry configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default namespace used by [`Registry::key`](crate::Registry::key).
pub const DEFAULT_NAMESPACE: &str = "generic";

/// Default ceiling on the size of a single cartesian product.
pub const DEFAULT_MAX_COMBINATIONS: usize = 65536;

/// Tunables for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	pub default_namespace: String,
	pub max_combinations: usize,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			default_namespace: DEFAULT_NAMESPACE.to_string(),
			max_combinations: DEFAULT_MAX_COMBINATIONS,
		}
	}
}

/// Errors raised while loading a [`RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse registry config")]
	Parse(#[from] toml::de::Error),
	#[error("invalid registry config: {0}")]
	Invalid(String),
}

impl RegistryConfig {
	/// Parses and validates a configuration from TOML text.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses, and validates a TOML configuration file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), ?config, "loaded registry config");
		Ok(config)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.default_namespace.is_empty() {
			return Err(ConfigError::Invalid("default_namespace must not be empty".into()));
		}
		if self.max_combinations == 0 {
			return Err(ConfigError::Invalid("max_combinations must be at least 1".into()));
		}
		Ok(())
	}
}
