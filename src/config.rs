use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("could not read {}: {}", .path.display(), .source)]
	Read { path: PathBuf, source: std::io::Error },
	#[error("could not parse {}: {}", .path.display(), .source)]
	Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Display duration in milliseconds for requests with `expire_timeout == -1`.
	pub default_timeout_ms: u64,
}

impl Default for Config {
	fn default() -> Config {
		Config { default_timeout_ms: 5000 }
	}
}

impl Config {
	/// Reads `$XDG_CONFIG_HOME/tsuuchi/config.toml`; a missing file means
	/// defaults, a malformed one is a startup error.
	pub fn load() -> Result<Config, ConfigError> {
		let path = match dirs::config_dir() {
			Some(dir) => dir.join("tsuuchi").join("config.toml"),
			None => return Ok(Config::default()),
		};
		if !path.exists() {
			return Ok(Config::default());
		}
		Config::load_from(&path)
	}

	pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
		let text = std::fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
		toml::from_str(&text)
			.map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
	}

	pub fn default_timeout(&self) -> Duration {
		Duration::from_millis(self.default_timeout_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_apply_when_fields_are_absent() {
		let config: Config = toml::from_str("").unwrap();
		assert_eq!(config.default_timeout_ms, 5000);
		assert_eq!(config.default_timeout(), Duration::from_millis(5000));
	}

	#[test]
	fn explicit_timeout_overrides_the_default() {
		let config: Config = toml::from_str("default_timeout_ms = 1200").unwrap();
		assert_eq!(config.default_timeout(), Duration::from_millis(1200));
	}
}
