use axum::{
    Json,
    body::Body,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::info;

use super::{error::ApiError, models::RevalidateResponse, state::AppState, utils::read_body};
use crate::content::{self, ContentChange, SIGNATURE_HEADER};

const ENDPOINT: &str = "revalidate";

/// Content webhook (POST /api/revalidate)
///
/// Authenticates the CMS by HMAC signature over the raw body, then
/// revalidates the site paths affected by the changed document.
pub async fn revalidate(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = handle(&state, &headers, body).await;
    state.reporter.finish(ENDPOINT, result)
}

async fn handle(state: &AppState, headers: &HeaderMap, body: Body) -> Result<Json<RevalidateResponse>, ApiError> {
    let secret = state
        .config
        .webhook
        .secret
        .as_deref()
        .ok_or_else(|| ApiError::Internal("webhook secret is not configured".into()))?;

    let bytes = read_body(body, state.config.server.max_body_bytes).await?;
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    if !content::verify(secret, &bytes, signature) {
        return Err(ApiError::Unauthenticated("invalid webhook signature".into()));
    }

    let payload: Value = serde_json::from_slice(&bytes)?;
    let change = ContentChange::from_payload(&payload).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let paths = content::paths_for(&change.doc_type, change.slug.as_deref(), &state.config.webhook.locales);
    state
        .revalidator
        .revalidate(&paths)
        .await
        .map_err(|e| ApiError::ExternalService {
            service: "revalidation",
            message: e.to_string(),
        })?;

    info!(doc_type = %change.doc_type, doc_id = %change.id, count = paths.len(), "Content revalidated");
    Ok(Json(RevalidateResponse {
        revalidated: true,
        paths,
        timestamp: Utc::now().timestamp_millis(),
    }))
}

/// Webhook contract (GET /api/revalidate)
pub async fn describe() -> impl IntoResponse {
    Json(json!({
        "endpoint": "/api/revalidate",
        "method": "POST",
        "signatureHeader": SIGNATURE_HEADER,
        "signature": format!("{}<hex HMAC-SHA256 of the raw body>", content::SIGNATURE_PREFIX),
        "requiredFields": ["_type", "_id"],
        "optionalFields": ["slug"],
        "types": ["product", "blogPost", "certification", "resource", "teamMember", "testimonial", "page", "siteSettings"],
    }))
}
