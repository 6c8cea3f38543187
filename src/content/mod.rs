//! CMS content webhook: signature check, change parsing and cache
//! revalidation of the affected site paths.

mod paths;
mod signature;

pub use paths::paths_for;
pub use signature::{SIGNATURE_PREFIX, sign, verify};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

pub const SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("webhook payload is not a JSON object")]
    NotAnObject,

    #[error("webhook payload is missing `{0}`")]
    MissingField(&'static str),
}

/// The part of a CMS change notification this service cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub doc_type: String,
    pub id: String,
    pub slug: Option<String>,
}

impl ContentChange {
    /// Reads `_type`, `_id` and an optional `slug`, given either as a string
    /// or as `{"current": "..."}`.
    pub fn from_payload(payload: &Value) -> Result<Self, ContentError> {
        let object = payload.as_object().ok_or(ContentError::NotAnObject)?;

        let field = |key: &'static str| {
            object
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or(ContentError::MissingField(key))
        };

        let slug = match object.get("slug") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(o)) => o.get("current").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };

        Ok(Self {
            doc_type: field("_type")?,
            id: field("_id")?,
            slug,
        })
    }
}

#[derive(Debug, Error)]
pub enum RevalidateError {
    #[error("revalidation hook request failed: {0}")]
    Transport(String),

    #[error("revalidation hook returned {0}")]
    Status(u16),
}

/// Invalidates cached renderings of site paths.
#[async_trait]
pub trait Revalidator: Send + Sync {
    async fn revalidate(&self, paths: &[String]) -> Result<(), RevalidateError>;
}

/// Used when no frontend hook is configured: paths are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRevalidator;

#[async_trait]
impl Revalidator for LogRevalidator {
    async fn revalidate(&self, paths: &[String]) -> Result<(), RevalidateError> {
        info!(?paths, "Revalidation requested (no hook configured)");
        Ok(())
    }
}

#[derive(Serialize)]
struct HookBody<'a> {
    paths: &'a [String],
}

/// Forwards paths to the frontend's revalidation endpoint.
pub struct HookRevalidator {
    client: reqwest::Client,
    url: String,
}

impl HookRevalidator {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl Revalidator for HookRevalidator {
    async fn revalidate(&self, paths: &[String]) -> Result<(), RevalidateError> {
        let response = self
            .client
            .post(&self.url)
            .json(&HookBody { paths })
            .send()
            .await
            .map_err(|e| RevalidateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevalidateError::Status(status.as_u16()));
        }
        debug!(count = paths.len(), "Revalidation hook accepted paths");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::post};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[test]
    fn parses_change_with_object_slug() {
        let change = ContentChange::from_payload(&json!({
            "_type": "product",
            "_id": "abc",
            "slug": {"current": "raw-cashews"}
        }))
        .unwrap();
        assert_eq!(change.doc_type, "product");
        assert_eq!(change.id, "abc");
        assert_eq!(change.slug.as_deref(), Some("raw-cashews"));
    }

    #[test]
    fn requires_type_and_id() {
        assert!(matches!(
            ContentChange::from_payload(&json!({"_id": "abc"})),
            Err(ContentError::MissingField("_type"))
        ));
        assert!(matches!(
            ContentChange::from_payload(&json!({"_type": "product", "_id": ""})),
            Err(ContentError::MissingField("_id"))
        ));
        assert!(matches!(
            ContentChange::from_payload(&json!([1])),
            Err(ContentError::NotAnObject)
        ));
    }

    #[tokio::test]
    async fn hook_receives_paths() {
        let received: Arc<Mutex<Vec<String>>> = Arc::default();
        let sink = received.clone();
        let app = Router::new().route(
            "/revalidate",
            post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    let paths = body["paths"]
                        .as_array()
                        .map(|a| a.iter().filter_map(|p| p.as_str().map(str::to_string)).collect())
                        .unwrap_or_default();
                    *sink.lock().unwrap() = paths;
                    StatusCode::OK
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let hook = HookRevalidator::new(reqwest::Client::new(), format!("http://{addr}/revalidate"));
        let paths = vec!["/fr".to_string(), "/en".to_string()];
        hook.revalidate(&paths).await.unwrap();

        assert_eq!(*received.lock().unwrap(), paths);
    }
}
