//! # evidex-config
//!
//! Layered configuration loading for Evidex using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`EVIDEX_*` prefix, `__` as separator)
//! 2. Project-level `.evidex/config.toml`
//! 3. User-level `~/.config/evidex/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `EVIDEX_POOLING__Z_SCORE` -> `pooling.z_score`,
//! `EVIDEX_EXTRACTION__WINDOW_CHARS` -> `extraction.window_chars`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use evidex_config::EvidexConfig;
//!
//! let config = EvidexConfig::load_with_dotenv().expect("config");
//! println!("source priority: {:?}", config.sources.priority);
//! ```

mod error;
mod extraction;
mod pooling;
mod sources;

pub use error::ConfigError;
pub use extraction::ExtractionConfig;
pub use pooling::PoolingConfig;
pub use sources::SourcesConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvidexConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub pooling: PoolingConfig,
}

impl EvidexConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a provider fails to parse and
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".evidex/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("EVIDEX_").split("__"))
    }

    /// Check cross-field and range constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sources.validate()?;
        self.extraction.validate()?;
        self.pooling.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("evidex").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) looking for a `.env`
    /// file, then falls back to the current directory. Silently does nothing
    /// if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EvidexConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.priority.len(), 4);
        assert_eq!(config.extraction.window_chars, 80);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = Figment::from(Serialized::defaults(EvidexConfig::default()));
        let config = EvidexConfig::from_figment(&figment).expect("should extract defaults");
        assert_eq!(config, EvidexConfig::default());
    }
}
