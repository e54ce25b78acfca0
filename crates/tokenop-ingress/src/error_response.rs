//! Converts a [`GatewayError`] into the wire error envelope
//! `{ "error": <message>, "name": <variant>, "requestId": <id> }`, plus a
//! `txHash` field when the error is an `UpstreamTimeout` that followed a
//! successful broadcast.
//!
//! Every error that reaches the HTTP boundary — whether raised by a
//! handler, by ingress middleware itself (auth, rate limiting, body-size
//! cap), or by a recovered panic — is rendered through this single
//! function so the wire shape never drifts between call sites.

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use tokenop_types::GatewayError;

use crate::correlation::CorrelationId;

/// Builds the JSON body alone, split out from [`render_error`] so the shape
/// — including the `txHash` carried by a post-broadcast timeout — can be
/// checked without standing up a full `Response`.
fn error_body(err: &GatewayError, request_id: &str) -> serde_json::Value {
    let mut body = json!({
        "error": err.public_message(),
        "name": err.name(),
        "requestId": request_id,
    });

    if let GatewayError::UpstreamTimeout { tx_hash: Some(tx_hash) } = err {
        body["txHash"] = json!(tx_hash);
    }

    body
}

pub fn render_error(err: &GatewayError, correlation_id: Option<&CorrelationId>) -> Response {
    let request_id = correlation_id.map(|c| c.to_string()).unwrap_or_default();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        tracing::error!(
            request_id,
            name = err.name(),
            detail = %err,
            "request failed with a server error"
        );
    } else {
        tracing::info!(request_id, name = err.name(), "request rejected");
    }

    let mut response = (status, Json(error_body(err, &request_id))).into_response();

    if let GatewayError::RateLimitExceeded { retry_after_ms } = err {
        let seconds = retry_after_ms.div_ceil(1000).max(1);
        if let Ok(value) = seconds.to_string().parse() {
            response.headers_mut().insert("retry-after", value);
        }
    }

    response
}

/// Handler-facing helper: pulls the correlation id already attached to the
/// request by [`crate::correlation::assign_correlation_id`] before
/// rendering.
pub fn render_error_for(req: &Request<Body>, err: &GatewayError) -> Response {
    let correlation_id = req.extensions().get::<CorrelationId>();
    render_error(err, correlation_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_timeout_carries_the_tx_hash() {
        let err = GatewayError::UpstreamTimeout {
            tx_hash: Some("0xabc".to_string()),
        };
        let body = error_body(&err, "req-1");
        assert_eq!(body["txHash"], "0xabc");
        assert_eq!(body["name"], "UpstreamTimeout");
    }

    #[test]
    fn upstream_timeout_without_a_hash_omits_the_field() {
        let err = GatewayError::UpstreamTimeout { tx_hash: None };
        let body = error_body(&err, "req-1");
        assert!(body.get("txHash").is_none());
    }

    #[test]
    fn other_errors_never_carry_a_tx_hash() {
        let err = GatewayError::bad_request("bad input");
        let body = error_body(&err, "req-1");
        assert!(body.get("txHash").is_none());
    }
}
