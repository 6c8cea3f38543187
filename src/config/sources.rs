use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "AGRILEAD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/agrilead.toml";
const ENV_PREFIX: &str = "AGRILEAD";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = path.unwrap_or_else(|| {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    });

    let mut config = load_from_sources(config_path)?;
    load_secrets(&mut config, |name| env::var(name).ok());

    Ok(config)
}

/// Secrets never live in TOML files, only in the environment.
pub(super) fn load_secrets(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(secret) = lookup("RECAPTCHA_SECRET_KEY") {
        config.recaptcha.secret = Some(secret);
    }

    config.email.api_key = lookup("EMAIL_API_KEY").or_else(|| lookup("RESEND_API_KEY"));

    if let Some(secret) = lookup("WEBHOOK_SECRET") {
        config.webhook.secret = Some(secret);
    }

    if config.store.url.is_none() {
        config.store.url = lookup("REDIS_URL");
    }

    if let Some(dsn) = lookup("SENTRY_DSN") {
        config.telemetry.sentry_dsn = Some(dsn);
    }
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // AGRILEAD__RATE_LIMIT__MAX_REQUESTS -> rate_limit.max_requests
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
