//! Per-request correlation id: read from `X-Request-Id` if present and
//! well-formed, otherwise a fresh one is generated. Propagated into request
//! extensions (for handlers and the error handler) and echoed back as a
//! response header.

use axum::body::Body;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use std::convert::Infallible;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps the id attached to request extensions by [`assign_correlation_id`].
#[derive(Debug, Clone)]
pub struct CorrelationId(pub String);

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lets handlers pull the id assigned by [`assign_correlation_id`] as a
/// plain extractor argument. Falls back to a fresh id if the middleware
/// was somehow skipped, rather than rejecting the request.
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CorrelationId>()
            .cloned()
            .unwrap_or_else(|| CorrelationId(Uuid::new_v4().to_string())))
    }
}

/// Well-formed here means non-empty and short enough to be a sane header
/// value; anything else is treated as absent and replaced.
fn is_well_formed(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.len() <= 200
}

pub async fn assign_correlation_id(mut req: Request<Body>, next: Next) -> Response {
    let inbound = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| is_well_formed(s))
        .map(str::to_string);

    let id = inbound.unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(CorrelationId(id.clone()));

    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
