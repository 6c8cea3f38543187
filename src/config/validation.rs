use super::models::{Config, StoreBackend};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Store backend is redis but no url is configured (set REDIS_URL)")]
    MissingRedisUrl,

    #[error("Rate limit {field} must be positive")]
    InvalidRateLimit { field: String },

    #[error("reCAPTCHA min_score must be within [0, 1], got {0}")]
    InvalidMinScore(f64),

    #[error("Retention TTL must be positive: {field} = {value}")]
    InvalidRetentionTTL { field: String, value: u32 },

    #[error("Resource '{id}' must point at an http(s) url")]
    InvalidResourceUrl { id: String },

    #[error("Email address for {field} is malformed: {value}")]
    InvalidAddress { field: String, value: String },

    #[error("Production requires {0}")]
    MissingProductionSecret(&'static str),

    #[error("Webhook must revalidate at least one locale")]
    NoWebhookLocales,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_store(config)?;
    validate_rate_limit(config)?;
    validate_recaptcha(config)?;
    validate_retention(config)?;
    validate_resources(config)?;
    validate_email(config)?;
    validate_webhook(config)?;
    validate_production(config)?;
    Ok(())
}

fn validate_store(config: &Config) -> Result<(), ValidationError> {
    if config.store.backend == StoreBackend::Redis && config.store.url.is_none() {
        return Err(ValidationError::MissingRedisUrl);
    }
    Ok(())
}

fn validate_rate_limit(config: &Config) -> Result<(), ValidationError> {
    if config.rate_limit.window_secs == 0 {
        return Err(ValidationError::InvalidRateLimit {
            field: "window_secs".to_string(),
        });
    }
    if config.rate_limit.max_requests == 0 {
        return Err(ValidationError::InvalidRateLimit {
            field: "max_requests".to_string(),
        });
    }
    if let Some((endpoint, _)) = config.rate_limit.endpoints.iter().find(|(_, max)| **max == 0) {
        return Err(ValidationError::InvalidRateLimit {
            field: format!("endpoints.{endpoint}"),
        });
    }
    Ok(())
}

fn validate_recaptcha(config: &Config) -> Result<(), ValidationError> {
    let score = config.recaptcha.min_score;
    if !(0.0..=1.0).contains(&score) {
        return Err(ValidationError::InvalidMinScore(score));
    }
    Ok(())
}

fn validate_retention(config: &Config) -> Result<(), ValidationError> {
    let ttls = [
        ("rfq_ttl_days", config.leads.rfq_ttl_days),
        ("catalog_ttl_days", config.leads.catalog_ttl_days),
        ("event_ttl_days", config.leads.event_ttl_days),
    ];
    for (field, value) in ttls {
        if value == 0 {
            return Err(ValidationError::InvalidRetentionTTL {
                field: field.to_string(),
                value,
            });
        }
    }
    Ok(())
}

fn validate_resources(config: &Config) -> Result<(), ValidationError> {
    for (id, resource) in &config.resources {
        if !resource.url.starts_with("http://") && !resource.url.starts_with("https://") {
            return Err(ValidationError::InvalidResourceUrl { id: id.clone() });
        }
    }
    Ok(())
}

fn validate_email(config: &Config) -> Result<(), ValidationError> {
    let addresses = [
        ("from", &config.email.from),
        ("operator_address", &config.email.operator_address),
    ];
    for (field, value) in addresses {
        if !value.contains('@') {
            return Err(ValidationError::InvalidAddress {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }
    Ok(())
}

fn validate_webhook(config: &Config) -> Result<(), ValidationError> {
    if config.webhook.locales.is_empty() {
        return Err(ValidationError::NoWebhookLocales);
    }
    Ok(())
}

/// Production deployments must be able to deliver leads and authenticate
/// the CMS.
fn validate_production(config: &Config) -> Result<(), ValidationError> {
    if !config.server.environment.is_production() {
        return Ok(());
    }
    if config.email.api_key.is_none() {
        return Err(ValidationError::MissingProductionSecret("EMAIL_API_KEY"));
    }
    if config.webhook.secret.is_none() {
        return Err(ValidationError::MissingProductionSecret("WEBHOOK_SECRET"));
    }
    if config.store.backend == StoreBackend::Memory {
        return Err(ValidationError::MissingProductionSecret("a redis store backend"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::models::*;
    use super::*;

    fn create_test_config() -> Config {
        let mut config = Config::default();
        config.store.backend = StoreBackend::Memory;
        config.resources.insert(
            "catalog".to_string(),
            ResourceConfig {
                url: "https://cdn.example.com/catalog.pdf".to_string(),
                title: None,
            },
        );
        config
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_redis_requires_url() {
        let mut config = create_test_config();
        config.store.backend = StoreBackend::Redis;
        assert!(matches!(validate(&config), Err(ValidationError::MissingRedisUrl)));

        config.store.url = Some("redis://localhost:6379".to_string());
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_rate_limit() {
        let mut config = create_test_config();
        config.rate_limit.endpoints.insert("rfq".to_string(), 0);
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidRateLimit { field }) if field == "endpoints.rfq"
        ));
    }

    #[test]
    fn test_min_score_range() {
        let mut config = create_test_config();
        config.recaptcha.min_score = 1.5;
        assert!(matches!(validate(&config), Err(ValidationError::InvalidMinScore(_))));
    }

    #[test]
    fn test_zero_ttl() {
        let mut config = create_test_config();
        config.leads.catalog_ttl_days = 0;
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidRetentionTTL { .. })
        ));
    }

    #[test]
    fn test_resource_url_scheme() {
        let mut config = create_test_config();
        config.resources.get_mut("catalog").unwrap().url = "ftp://files/catalog.pdf".to_string();
        assert!(matches!(
            validate(&config),
            Err(ValidationError::InvalidResourceUrl { .. })
        ));
    }

    #[test]
    fn test_production_requires_secrets() {
        let mut config = create_test_config();
        config.server.environment = Environment::Production;
        config.store.backend = StoreBackend::Redis;
        config.store.url = Some("redis://localhost:6379".to_string());
        assert!(matches!(
            validate(&config),
            Err(ValidationError::MissingProductionSecret("EMAIL_API_KEY"))
        ));

        config.email.api_key = Some("key".to_string());
        config.webhook.secret = Some("secret".to_string());
        assert!(validate(&config).is_ok());
    }
}
