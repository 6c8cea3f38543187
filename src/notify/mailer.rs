use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::EmailConfig;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email provider is not configured: missing {0}")]
    NotConfigured(&'static str),

    #[error("email request failed: {0}")]
    Transport(String),

    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed email provider response: {0}")]
    Malformed(String),
}

/// Provider-assigned id of an accepted message.
pub type MessageId = String;

/// One message as handed to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, bon::Builder)]
pub struct OutgoingEmail {
    #[builder(into)]
    pub from: String,
    #[builder(into)]
    pub to: String,
    #[builder(into)]
    pub subject: String,
    pub html: String,
    pub text: String,
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<MessageId, MailError>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Client for a Resend-compatible `POST /emails` API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(client: reqwest::Client, config: &EmailConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<MessageId, MailError> {
        let api_key = self.api_key.as_deref().ok_or(MailError::NotConfigured("EMAIL_API_KEY"))?;

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| MailError::Malformed(e.to_string()))?;

        debug!(message_id = %sent.id, to = %email.to, "Email accepted by provider");
        Ok(sent.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    fn email() -> OutgoingEmail {
        OutgoingEmail::builder()
            .from("Leads <noreply@example.com>")
            .to("sales@example.com")
            .subject("New quote request")
            .html("<p>hi</p>".to_string())
            .text("hi".to_string())
            .reply_to("buyer@example.org")
            .build()
    }

    async fn spawn(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/emails")
    }

    fn mailer(url: String, key: Option<&str>) -> ResendMailer {
        let config = EmailConfig {
            api_url: url,
            api_key: key.map(str::to_string),
            ..EmailConfig::default()
        };
        ResendMailer::new(reqwest::Client::new(), &config)
    }

    #[tokio::test]
    async fn sends_json_with_bearer_key() {
        let app = Router::new().route(
            "/emails",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorized = headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer re_test");
                if !authorized || body["reply_to"] != "buyer@example.org" || body["to"] != "sales@example.com" {
                    return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"message": "bad"})));
                }
                (StatusCode::OK, Json(json!({"id": "msg_123"})))
            }),
        );
        let url = spawn(app).await;

        let id = mailer(url, Some("re_test")).send(&email()).await.unwrap();
        assert_eq!(id, "msg_123");
    }

    #[tokio::test]
    async fn provider_rejection_is_an_error() {
        let app = Router::new().route("/emails", post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }));
        let url = spawn(app).await;

        let err = mailer(url, Some("re_test")).send(&email()).await.unwrap_err();
        assert!(matches!(err, MailError::Rejected { status: 429, ref body } if body == "slow down"));
    }

    #[tokio::test]
    async fn missing_key_never_calls_out() {
        let err = mailer("http://127.0.0.1:9/emails".to_string(), None)
            .send(&email())
            .await
            .unwrap_err();
        assert!(matches!(err, MailError::NotConfigured("EMAIL_API_KEY")));
    }

    #[test]
    fn reply_to_is_omitted_when_absent() {
        let email = OutgoingEmail::builder()
            .from("a@example.com")
            .to("b@example.com")
            .subject("s")
            .html(String::new())
            .text(String::new())
            .build();
        let json = serde_json::to_value(&email).unwrap();
        assert!(json.get("reply_to").is_none());
    }
}
