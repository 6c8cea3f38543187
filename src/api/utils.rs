//! API utility functions
//!
//! Pure helpers for request processing shared by the handlers.

use axum::body::Body;
use axum::http::{HeaderMap, header};
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};

use crate::api::error::ApiError;

/// Parses and validates Content-Type header for application/json
///
/// Accepts:
/// - `application/json`
/// - `application/json; charset=utf-8`
///
/// Rejects:
/// - `application/jsonp`
/// - `application/json-patch+json`
/// - `text/json`
/// - Malformed media types
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid Content-Type: {content_type}")))?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::BadRequest(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Requires a JSON Content-Type header.
pub fn require_json(headers: &HeaderMap) -> Result<(), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing Content-Type header".into()))?;
    parse_content_type(content_type)?;
    Ok(())
}

/// Reads the whole body, refusing anything above `max_size` bytes.
pub async fn read_body(body: Body, max_size: usize) -> Result<Bytes, ApiError> {
    let data = Limited::new(body, max_size)
        .collect()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable body (limit {max_size} bytes): {e}")))?
        .to_bytes();
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content_type_valid() {
        assert!(parse_content_type("application/json").is_ok());
        assert!(parse_content_type("application/json; charset=utf-8").is_ok());
        assert!(parse_content_type("application/json; charset=UTF-8").is_ok());
    }

    #[test]
    fn test_parse_content_type_invalid() {
        assert!(parse_content_type("application/jsonp").is_err());
        assert!(parse_content_type("application/json-patch+json").is_err());
        assert!(parse_content_type("text/json").is_err());
        assert!(parse_content_type("text/plain").is_err());
        assert!(parse_content_type("invalid").is_err());
        assert!(parse_content_type("").is_err());
    }

    #[test]
    fn test_require_json_header() {
        let mut headers = HeaderMap::new();
        assert!(require_json(&headers).is_err());
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(require_json(&headers).is_ok());
    }

    #[tokio::test]
    async fn test_read_body_limit() {
        let body = Body::from(vec![b'x'; 64]);
        assert_eq!(read_body(body, 64).await.unwrap().len(), 64);

        let body = Body::from(vec![b'x'; 65]);
        assert!(matches!(
            read_body(body, 64).await,
            Err(ApiError::BadRequest(msg)) if msg.contains("limit 64 bytes")
        ));
    }
}
