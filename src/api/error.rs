use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::forms::FieldErrors;

/// Every failure a handler can produce.
///
/// All variants but [`ApiError::Unclassified`] carry an explicit status;
/// unclassified errors are sorted by message in [`super::classify`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limit exceeded on {0}")]
    RateLimited(String),

    #[error("{service} service failed: {message}")]
    ExternalService { service: &'static str, message: String },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Unclassified(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            ApiError::Unauthenticated(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::ExternalService { .. } => Some(StatusCode::BAD_GATEWAY),
            ApiError::Internal(_) => Some(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Unclassified(_) => None,
        }
    }

    /// Structured detail for the client, only ever present on validation
    /// failures.
    pub fn details(&self) -> Option<Value> {
        match self {
            ApiError::Validation(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::BadRequest(format!("malformed JSON: {value}"))
    }
}

impl From<FieldErrors> for ApiError {
    fn from(value: FieldErrors) -> Self {
        ApiError::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_statuses() {
        assert_eq!(
            ApiError::RateLimited("rfq".into()).status_code(),
            Some(StatusCode::TOO_MANY_REQUESTS)
        );
        assert_eq!(
            ApiError::ExternalService {
                service: "email",
                message: "timeout".into()
            }
            .status_code(),
            Some(StatusCode::BAD_GATEWAY)
        );
        assert_eq!(ApiError::Unclassified("boom".into()).status_code(), None);
    }

    #[test]
    fn details_only_for_validation() {
        let err = ApiError::Validation(FieldErrors::single("contact.email", "Invalid email address"));
        let details = err.details().unwrap();
        assert_eq!(details[0]["field"], "contact.email");
        assert!(ApiError::BadRequest("x".into()).details().is_none());
    }

    #[test]
    fn json_errors_are_bad_requests() {
        let err: ApiError = serde_json::from_str::<Value>("{").unwrap_err().into();
        assert_eq!(err.status_code(), Some(StatusCode::BAD_REQUEST));
    }
}
