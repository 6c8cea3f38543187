use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use crate::locale::Locale;

const DAY_SECS: u64 = 24 * 60 * 60;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub leads: LeadsConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Downloadable assets keyed by resource id
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub environment: Environment,
    /// Upper bound on accepted request bodies
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Timeout applied to every outbound HTTP call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            environment: Environment::default(),
            max_body_bytes: default_max_body_bytes(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_http_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    Memory,
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// redis://[:password@]host[:port][/db] (loaded from REDIS_URL when unset)
    pub url: Option<String>,
    #[serde(default = "default_pool_max")]
    pub pool_max: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            url: None,
            pool_max: default_pool_max(),
        }
    }
}

fn default_pool_max() -> usize {
    16
}

/// Sliding-window limits for the public submission endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Per-endpoint overrides of `max_requests`
    #[serde(default)]
    pub endpoints: BTreeMap<String, u32>,
    /// Bucket shared by every client whose address can't be determined
    #[serde(default = "default_unknown_bucket")]
    pub unknown_client_bucket: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_requests: default_max_requests(),
            endpoints: BTreeMap::new(),
            unknown_client_bucket: default_unknown_bucket(),
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn max_for(&self, endpoint: &str) -> u32 {
        self.endpoints
            .get(endpoint)
            .copied()
            .unwrap_or(self.max_requests)
    }
}

fn default_window_secs() -> u64 {
    60
}

fn default_max_requests() -> u32 {
    3
}

fn default_unknown_bucket() -> String {
    "unknown".to_string()
}

/// Bot-score verification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecaptchaConfig {
    /// Loaded from RECAPTCHA_SECRET_KEY, never from the file
    #[serde(skip)]
    pub secret: Option<String>,
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    /// Hostname the tokens must have been issued for
    #[serde(default = "default_site_domain")]
    pub site_domain: String,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret: None,
            verify_url: default_verify_url(),
            min_score: default_min_score(),
            site_domain: default_site_domain(),
        }
    }
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_min_score() -> f64 {
    0.5
}

fn default_site_domain() -> String {
    "localhost".to_string()
}

/// Transactional email provider
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    #[serde(default = "default_email_api_url")]
    pub api_url: String,
    /// Loaded from EMAIL_API_KEY / RESEND_API_KEY
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_from")]
    pub from: String,
    #[serde(default = "default_operator_address")]
    pub operator_address: String,
    #[serde(default = "default_operator_locale")]
    pub operator_locale: Locale,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_url: default_email_api_url(),
            api_key: None,
            from: default_from(),
            operator_address: default_operator_address(),
            operator_locale: default_operator_locale(),
        }
    }
}

fn default_email_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from() -> String {
    "Leads <noreply@localhost>".to_string()
}

fn default_operator_address() -> String {
    "sales@localhost".to_string()
}

fn default_operator_locale() -> Locale {
    Locale::Fr
}

/// Lead persistence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeadsConfig {
    #[serde(default = "default_rfq_ttl_days")]
    pub rfq_ttl_days: u32,
    #[serde(default = "default_catalog_ttl_days")]
    pub catalog_ttl_days: u32,
    #[serde(default = "default_event_ttl_days")]
    pub event_ttl_days: u32,
    /// Maximum entries kept in each index list (0 = unbounded)
    #[serde(default = "default_index_cap")]
    pub index_cap: usize,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            rfq_ttl_days: default_rfq_ttl_days(),
            catalog_ttl_days: default_catalog_ttl_days(),
            event_ttl_days: default_event_ttl_days(),
            index_cap: default_index_cap(),
        }
    }
}

impl LeadsConfig {
    pub fn rfq_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.rfq_ttl_days) * DAY_SECS)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.catalog_ttl_days) * DAY_SECS)
    }

    pub fn event_ttl(&self) -> Duration {
        Duration::from_secs(u64::from(self.event_ttl_days) * DAY_SECS)
    }
}

fn default_rfq_ttl_days() -> u32 {
    30
}

fn default_catalog_ttl_days() -> u32 {
    90
}

fn default_event_ttl_days() -> u32 {
    30
}

fn default_index_cap() -> usize {
    10_000
}

/// CMS content webhook
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Loaded from WEBHOOK_SECRET
    #[serde(skip)]
    pub secret: Option<String>,
    /// Locales whose paths are revalidated
    #[serde(default = "default_locales")]
    pub locales: Vec<Locale>,
    /// Frontend endpoint receiving the paths to revalidate
    pub hook_url: Option<String>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            secret: None,
            locales: default_locales(),
            hook_url: None,
        }
    }
}

fn default_locales() -> Vec<Locale> {
    vec![Locale::Fr, Locale::En]
}

/// A downloadable asset served through the redirect proxy
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResourceConfig {
    pub url: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging and error tracking
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Loaded from SENTRY_DSN
    #[serde(skip)]
    pub sentry_dsn: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.leads.rfq_ttl(), Duration::from_secs(30 * DAY_SECS));
        assert_eq!(config.leads.catalog_ttl(), Duration::from_secs(90 * DAY_SECS));
        assert_eq!(config.recaptcha.min_score, 0.5);
        assert_eq!(config.webhook.locales, vec![Locale::Fr, Locale::En]);
    }

    #[test]
    fn test_endpoint_override() {
        let mut config = RateLimitConfig::default();
        config.endpoints.insert("contact".to_string(), 5);
        assert_eq!(config.max_for("contact"), 5);
        assert_eq!(config.max_for("rfq"), 3);
    }
}
