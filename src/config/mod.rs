//! Configuration management
//!
//! Settings are layered, lowest priority first:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables
//!
//! # Environment Variables
//!
//! Any setting can be overridden with `AGRILEAD__<section>__<key>`, e.g.
//! `AGRILEAD__RATE_LIMIT__MAX_REQUESTS=5` or
//! `AGRILEAD__SERVER__ENVIRONMENT=production`.
//!
//! Secrets are only ever read from the environment: `RECAPTCHA_SECRET_KEY`,
//! `EMAIL_API_KEY` (or `RESEND_API_KEY`), `WEBHOOK_SECRET`, `REDIS_URL` and
//! `SENTRY_DSN`.
//!
//! # Configuration File
//!
//! By default the file is `config/agrilead.toml`; `AGRILEAD_CONFIG` or the
//! `--config` flag point elsewhere.

mod models;
mod sources;
mod validation;

pub use models::{
    Config, EmailConfig, Environment, LeadsConfig, LogFormat, RateLimitConfig, RecaptchaConfig,
    ResourceConfig, ServerConfig, StoreBackend, StoreConfig, TelemetryConfig, WebhookConfig,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment) and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or validation fails.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path, ignoring secrets in the
    /// environment. Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Looks up a downloadable resource by id.
    pub fn resource(&self, id: &str) -> Option<&ResourceConfig> {
        self.resources.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[store]
backend = "memory"

[resources.catalog]
url = "https://cdn.example.com/catalog.pdf"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert!(config.resource("catalog").is_some());
        assert!(config.resource("brochure").is_none());
    }

    #[test]
    fn test_validation_catches_missing_redis_url() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        fs::write(&config_path, "[store]\nbackend = \"redis\"\n").unwrap();

        let result = Config::load_from_path(config_path);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::MissingRedisUrl)
        ));
    }
}
