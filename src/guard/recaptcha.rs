use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::RecaptchaConfig;
use crate::tracking::{ErrorTracker, TrackedEvent};

/// Verifies a client-side bot-detection token for an expected action.
#[async_trait]
pub trait ScoreVerifier: Send + Sync {
    async fn verify(&self, token: &str, expected_action: &str) -> bool;
}

/// Body returned by the `siteverify` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Decides whether a verification response is acceptable.
pub fn accept(response: &VerifyResponse, expected_action: &str, site_domain: &str, min_score: f64) -> bool {
    let score_ok = response.score.is_some_and(|s| s >= min_score);
    let action_ok = response.action.as_deref() == Some(expected_action);
    let host_ok = matches!(
        response.hostname.as_deref(),
        Some(host) if host == site_domain || host == "localhost"
    );
    response.success && score_ok && action_ok && host_ok
}

/// reCAPTCHA v3 verifier.
///
/// Any transport problem (timeout, non-200, unparseable body) rejects the
/// token. This is deliberately the opposite of the rate limiter's policy.
pub struct RecaptchaVerifier {
    client: reqwest::Client,
    config: RecaptchaConfig,
    tracker: Arc<dyn ErrorTracker>,
}

impl RecaptchaVerifier {
    pub fn new(client: reqwest::Client, config: RecaptchaConfig, tracker: Arc<dyn ErrorTracker>) -> Self {
        Self { client, config, tracker }
    }

    async fn fetch(&self, secret: &str, token: &str) -> Result<VerifyResponse, String> {
        let response = self
            .client
            .post(&self.config.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {status}"));
        }

        response
            .json::<VerifyResponse>()
            .await
            .map_err(|e| format!("malformed response: {e}"))
    }
}

#[async_trait]
impl ScoreVerifier for RecaptchaVerifier {
    async fn verify(&self, token: &str, expected_action: &str) -> bool {
        let Some(secret) = self.config.secret.as_deref() else {
            warn!("reCAPTCHA secret not configured, rejecting token");
            return false;
        };

        match self.fetch(secret, token).await {
            Ok(response) => {
                let accepted = accept(
                    &response,
                    expected_action,
                    &self.config.site_domain,
                    self.config.min_score,
                );
                debug!(
                    accepted,
                    score = ?response.score,
                    action = ?response.action,
                    hostname = ?response.hostname,
                    errors = ?response.error_codes,
                    "reCAPTCHA verified"
                );
                accepted
            }
            Err(e) => {
                warn!(error = %e, "reCAPTCHA verification failed");
                self.tracker.capture(
                    TrackedEvent::warning(format!("recaptcha verification failed: {e}"))
                        .tag("action", expected_action),
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::RecordingTracker;
    use axum::{Form, Json, Router, http::StatusCode, routing::post};
    use serde_json::json;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;

    fn good() -> VerifyResponse {
        VerifyResponse {
            success: true,
            score: Some(0.9),
            action: Some("rfq_submit".to_string()),
            hostname: Some("example.com".to_string()),
            error_codes: Vec::new(),
        }
    }

    #[test]
    fn accepts_good_response() {
        assert!(accept(&good(), "rfq_submit", "example.com", 0.5));
    }

    #[test]
    fn score_threshold_is_inclusive() {
        let response = VerifyResponse { score: Some(0.5), ..good() };
        assert!(accept(&response, "rfq_submit", "example.com", 0.5));
        let response = VerifyResponse { score: Some(0.49), ..good() };
        assert!(!accept(&response, "rfq_submit", "example.com", 0.5));
        let response = VerifyResponse { score: None, ..good() };
        assert!(!accept(&response, "rfq_submit", "example.com", 0.5));
    }

    #[test]
    fn rejects_wrong_action_host_or_failure() {
        assert!(!accept(&good(), "contact_submit", "example.com", 0.5));
        assert!(!accept(&good(), "rfq_submit", "other.com", 0.5));
        let response = VerifyResponse { success: false, ..good() };
        assert!(!accept(&response, "rfq_submit", "example.com", 0.5));
    }

    #[test]
    fn localhost_is_accepted_for_local_testing() {
        let response = VerifyResponse {
            hostname: Some("localhost".to_string()),
            ..good()
        };
        assert!(accept(&response, "rfq_submit", "example.com", 0.5));
    }

    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/siteverify")
    }

    fn verifier(url: String, secret: Option<&str>, tracker: Arc<RecordingTracker>) -> RecaptchaVerifier {
        let config = RecaptchaConfig {
            secret: secret.map(str::to_string),
            verify_url: url,
            site_domain: "example.com".to_string(),
            ..RecaptchaConfig::default()
        };
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        RecaptchaVerifier::new(client, config, tracker)
    }

    #[tokio::test]
    async fn verifies_against_remote_endpoint() {
        let app = Router::new().route(
            "/siteverify",
            post(|Form(form): Form<HashMap<String, String>>| async move {
                let ok = form.get("secret").map(String::as_str) == Some("s3cret")
                    && form.get("response").map(String::as_str) == Some("token-1");
                Json(json!({
                    "success": ok,
                    "score": 0.8,
                    "action": "rfq_submit",
                    "hostname": "example.com"
                }))
            }),
        );
        let url = spawn(app).await;
        let tracker = Arc::new(RecordingTracker::default());
        let verifier = verifier(url, Some("s3cret"), tracker.clone());

        assert!(verifier.verify("token-1", "rfq_submit").await);
        assert!(!verifier.verify("token-2", "rfq_submit").await);
        assert!(tracker.events().is_empty());
    }

    #[tokio::test]
    async fn transport_failures_fail_closed() {
        let app = Router::new()
            .route("/siteverify", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let url = spawn(app).await;
        let tracker = Arc::new(RecordingTracker::default());
        let verifier = verifier(url, Some("s3cret"), tracker.clone());

        assert!(!verifier.verify("token", "rfq_submit").await);
        assert_eq!(tracker.events().len(), 1);
    }

    #[tokio::test]
    async fn malformed_body_fails_closed() {
        let app = Router::new().route("/siteverify", post(|| async { "<html>oops</html>" }));
        let url = spawn(app).await;
        let tracker = Arc::new(RecordingTracker::default());
        let verifier = verifier(url, Some("s3cret"), tracker.clone());

        assert!(!verifier.verify("token", "rfq_submit").await);
        assert_eq!(tracker.events().len(), 1);
    }

    #[tokio::test]
    async fn missing_secret_rejects_without_calling_out() {
        let tracker = Arc::new(RecordingTracker::default());
        let verifier = verifier("http://127.0.0.1:9/unused".to_string(), None, tracker.clone());
        assert!(!verifier.verify("token", "rfq_submit").await);
        assert!(tracker.events().is_empty());
    }
}
