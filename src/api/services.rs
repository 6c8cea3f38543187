use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;
use tracing::{info, warn};

use super::{
    error::ApiError,
    models::{DownloadAccepted, EventAccepted, EventRequest, HealthResponse, SubmissionAccepted},
    state::AppState,
    utils::{read_body, require_json},
};
use crate::forms::{self, FormKind, Submission};
use crate::guard::client_ip;
use crate::leads::{AnalyticsEvent, LeadRecord};
use crate::locale::Locale;
use crate::sanitize::sanitize;
use crate::tracking::TrackedEvent;

/// Static description of one lead-capture endpoint.
#[derive(Debug, Clone, Copy)]
pub struct LeadForm {
    pub kind: FormKind,
    /// Rate-limit bucket name
    pub endpoint: &'static str,
    /// Action the bot-score token must have been issued for
    pub action: &'static str,
    pub path: &'static str,
}

pub const RFQ_FORM: LeadForm = LeadForm {
    kind: FormKind::Rfq,
    endpoint: "rfq",
    action: "rfq_submit",
    path: "/api/rfq",
};

pub const CATALOG_RFQ_FORM: LeadForm = LeadForm {
    kind: FormKind::CatalogRfq,
    endpoint: "catalog-rfq",
    action: "catalog_rfq_submit",
    path: "/api/catalog-rfq",
};

pub const CONTACT_FORM: LeadForm = LeadForm {
    kind: FormKind::Contact,
    endpoint: "contact",
    action: "contact_submit",
    path: "/api/contact",
};

pub const CATALOG_DOWNLOAD_FORM: LeadForm = LeadForm {
    kind: FormKind::CatalogDownload,
    endpoint: "catalog-download",
    action: "catalog_download",
    path: "/api/catalog-download",
};

const MAX_EVENT_NAME: usize = 64;
const MAX_EVENT_PATH: usize = 512;

/// Single-form RFQ (POST /api/rfq)
pub async fn submit_rfq(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = submit_lead(&state, RFQ_FORM, &headers, body).await;
    state.reporter.finish(RFQ_FORM.endpoint, result)
}

/// Multi-product catalog RFQ (POST /api/catalog-rfq)
pub async fn submit_catalog_rfq(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = submit_lead(&state, CATALOG_RFQ_FORM, &headers, body).await;
    state.reporter.finish(CATALOG_RFQ_FORM.endpoint, result)
}

/// Contact form (POST /api/contact)
pub async fn submit_contact(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = submit_lead(&state, CONTACT_FORM, &headers, body).await;
    state.reporter.finish(CONTACT_FORM.endpoint, result)
}

/// Catalog download lead (POST /api/catalog-download)
pub async fn submit_catalog_download(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = submit_lead(&state, CATALOG_DOWNLOAD_FORM, &headers, body).await;
    state.reporter.finish(CATALOG_DOWNLOAD_FORM.endpoint, result)
}

/// The lead pipeline shared by every form.
///
/// ## Flow:
/// 1. Rate limit per endpoint and client address (fails open)
/// 2. Content-Type and body size checks, JSON parsing
/// 3. Bot-score verification when a `recaptchaToken` is present (fails closed)
/// 4. Schema validation, then sanitization into a new value
/// 5. Persistence (best-effort)
/// 6. Operator notification (required, except for catalog downloads)
/// 7. Customer confirmation (best-effort)
///
/// Any error before step 6 completes aborts the request.
async fn submit_lead(state: &AppState, form: LeadForm, headers: &HeaderMap, body: Body) -> Result<Response, ApiError> {
    let client = client_ip(headers, &state.config.rate_limit.unknown_client_bucket);
    if !state.limiter.check(form.endpoint, &client).await {
        state.metrics.rate_limited();
        info!(endpoint = form.endpoint, client_ip = %client, "Rate limit exceeded");
        return Err(ApiError::RateLimited(form.endpoint.to_string()));
    }

    require_json(headers)?;
    let bytes = read_body(body, state.config.server.max_body_bytes).await?;
    let raw: Value = serde_json::from_slice(&bytes)?;

    if let Some(token) = recaptcha_token(&raw) {
        if !state.verifier.verify(token, form.action).await {
            state.metrics.bot_rejected();
            return Err(ApiError::Forbidden("bot verification failed".into()));
        }
    }

    let submission = forms::validate(form.kind, &raw)?.sanitized();

    if let Submission::CatalogDownload(download) = &submission {
        if state.config.resource(&download.catalog_id).is_none() {
            return Err(ApiError::NotFound(format!("resource {}", download.catalog_id)));
        }
    }

    let record = LeadRecord::new(submission, form.path);
    if !state.leads.persist(&record).await {
        state.metrics.persistence_failed();
    }

    let reference = record.id.as_str();
    let response = match &record.payload {
        Submission::CatalogDownload(download) => {
            notify_operator_best_effort(state, &record).await;
            Json(DownloadAccepted {
                success: true,
                download_url: format!("/api/resources/{}", download.catalog_id),
                lead_id: reference.to_string(),
            })
            .into_response()
        }
        payload => {
            state
                .notifier
                .send_operator_notification(payload, reference)
                .await
                .map_err(|e| {
                    state.metrics.notification_failed();
                    ApiError::ExternalService {
                        service: "email",
                        message: e.to_string(),
                    }
                })?;

            confirm_best_effort(state, &record).await;

            Json(SubmissionAccepted {
                success: true,
                message: acknowledgement(payload.locale()).to_string(),
                request_id: reference.to_string(),
            })
            .into_response()
        }
    };

    state.metrics.lead_accepted();
    info!(endpoint = form.endpoint, lead_id = reference, "Lead accepted");
    Ok(response)
}

fn recaptcha_token(raw: &Value) -> Option<&str> {
    raw.get("recaptchaToken")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn acknowledgement(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => "Votre demande a bien été envoyée. Nous vous répondrons sous 48 heures ouvrées.",
        Locale::Es => "Su solicitud ha sido enviada. Le responderemos en un plazo de 48 horas laborables.",
        Locale::De => "Ihre Anfrage wurde gesendet. Wir antworten innerhalb von 48 Geschäftsstunden.",
        Locale::Ru => "Ваш запрос отправлен. Мы ответим в течение 48 рабочих часов.",
        Locale::En => "Your request has been sent. We will get back to you within 48 business hours.",
    }
}

async fn confirm_best_effort(state: &AppState, record: &LeadRecord) {
    if let Err(e) = state.notifier.send_confirmation(&record.payload, record.id.as_str()).await {
        state.metrics.notification_failed();
        warn!(lead_id = %record.id, error = %e, "Confirmation email failed");
        state.tracker.capture(
            TrackedEvent::warning(format!("confirmation email failed: {e}")).tag("lead_id", record.id.as_str()),
        );
    }
}

async fn notify_operator_best_effort(state: &AppState, record: &LeadRecord) {
    if let Err(e) = state
        .notifier
        .send_operator_notification(&record.payload, record.id.as_str())
        .await
    {
        state.metrics.notification_failed();
        warn!(lead_id = %record.id, error = %e, "Download notification failed");
        state.tracker.capture(
            TrackedEvent::warning(format!("download notification failed: {e}")).tag("lead_id", record.id.as_str()),
        );
    }
}

/// Download proxy (GET /api/resources/{id})
///
/// Redirects to the configured asset URL and logs the access.
pub async fn download_resource(State(state): State<AppState>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    let result = match state.config.resource(&id) {
        Some(resource) => {
            let client = client_ip(&headers, &state.config.rate_limit.unknown_client_bucket);
            state.metrics.resource_downloaded();
            info!(resource_id = %id, client_ip = %client, "Resource downloaded");
            Ok(Redirect::temporary(&resource.url))
        }
        None => Err(ApiError::NotFound(format!("resource {id}"))),
    };
    state.reporter.finish("resources", result)
}

/// Anonymous analytics event (POST /api/events)
pub async fn record_event(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Response {
    let result = accept_event(&state, &headers, body).await;
    state.reporter.finish("events", result)
}

async fn accept_event(state: &AppState, headers: &HeaderMap, body: Body) -> Result<impl IntoResponse, ApiError> {
    require_json(headers)?;
    let bytes = read_body(body, state.config.server.max_body_bytes).await?;
    let request: EventRequest = serde_json::from_slice(&bytes)?;

    let name = sanitize(&request.name);
    if name.is_empty() || name.chars().count() > MAX_EVENT_NAME {
        return Err(ApiError::BadRequest(format!(
            "event name must be 1 to {MAX_EVENT_NAME} characters"
        )));
    }
    let path = request
        .path
        .as_deref()
        .map(sanitize)
        .filter(|p| !p.is_empty())
        .map(|p| p.chars().take(MAX_EVENT_PATH).collect::<String>());

    let event = AnalyticsEvent::new(name, path, request.locale());
    state.leads.record_event(&event).await;

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAccepted {
            success: true,
            id: event.id,
        }),
    ))
}

/// Health check endpoint (GET /health)
///
/// Pings the store; returns 503 while it is unreachable.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let store_ok = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check: store unreachable");
            false
        }
    };

    let response = HealthResponse {
        status: if store_ok { "healthy" } else { "degraded" },
        store: if store_ok { "up" } else { "down" },
        environment: state.config.server.environment.as_str(),
        version: env!("CARGO_PKG_VERSION"),
        metrics: state.metrics.snapshot(),
    };

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}
