//! Request and response bodies of the HTTP API.
//!
//! Lead endpoints accept the form payloads described in [`crate::forms`]
//! plus an optional `recaptchaToken`:
//!
//! ```json
//! {
//!   "contact": {"name": "Awa Traoré", "email": "awa@example.com", "company": "Sahel Foods", "phone": "+221 77 123 45 67"},
//!   "products": [{"productId": "cashew-w320", "quantity": 500, "unit": "kg"}],
//!   "delivery": {"incoterm": "FOB", "destination": "Dakar"},
//!   "locale": "fr",
//!   "recaptchaToken": "03AGdBq2..."
//! }
//! ```
//!
//! Failures always use [`super::classify::ErrorEnvelope`].

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::observability::MetricsSnapshot;

/// 200 body of the RFQ, catalog-RFQ and contact endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionAccepted {
    pub success: bool,
    pub message: String,
    pub request_id: String,
}

/// 200 body of the catalog download endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadAccepted {
    pub success: bool,
    pub download_url: String,
    pub lead_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevalidateResponse {
    pub revalidated: bool,
    pub paths: Vec<String>,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl EventRequest {
    pub fn locale(&self) -> Option<Locale> {
        self.locale.as_deref().map(Locale::from_tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventAccepted {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub environment: &'static str,
    pub version: &'static str,
    pub metrics: MetricsSnapshot,
}
