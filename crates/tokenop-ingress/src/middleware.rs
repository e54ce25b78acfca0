//! The fixed ingress pipeline: security headers, body-size cap, rate
//! limiting, and API-key authentication. Composed onto every route except
//! `GET /v1/health` by the HTTP-surface crate.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::{ConnectInfo, Extension, Request};
use axum::middleware::Next;
use axum::response::Response;

use tokenop_types::{AuthCredential, GatewayError};

use crate::client_ip::extract_client_ip;
use crate::error_response::{render_error, render_error_for};
use crate::rate_limit::RateLimiter;

const MAX_BODY_BYTES: usize = 1_048_576;

pub async fn security_headers(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert("x-content-type-options", "nosniff".parse().unwrap());
    headers.insert("x-frame-options", "DENY".parse().unwrap());
    headers.insert("referrer-policy", "no-referrer".parse().unwrap());
    headers.insert("cache-control", "no-store".parse().unwrap());
    response
}

pub async fn cap_body_size(req: Request<Body>, next: Next) -> Response {
    if let Some(length) = req
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
    {
        if length > MAX_BODY_BYTES {
            let err = GatewayError::bad_request(format!(
                "request body of {length} bytes exceeds the {MAX_BODY_BYTES}-byte cap"
            ));
            return render_error_for(&req, &err);
        }
    }
    next.run(req).await
}

pub async fn rate_limit(
    Extension(limiter): Extension<Arc<RateLimiter>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let key = extract_client_ip(req.headers(), connect_info.map(|c| c.0));
    match limiter.check(&key).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            let err = GatewayError::RateLimitExceeded {
                retry_after_ms: retry_after.as_millis() as u64,
            };
            render_error_for(&req, &err)
        }
    }
}

pub async fn authenticate(
    Extension(credentials): Extension<Arc<AuthCredential>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let candidate = bearer_token(&req).or_else(|| api_key_header(&req));

    match candidate {
        Some(key) if credentials.contains(&key) => next.run(req).await,
        _ => render_error_for(&req, &GatewayError::Unauthorized),
    }
}

fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn api_key_header(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Logs exactly one structured event per request, at `warn` for 5xx or
/// slow responses and `debug` otherwise.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();
    let correlation_id = response
        .headers()
        .get(crate::correlation::REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    if status.is_server_error() || elapsed.as_millis() > 1000 {
        tracing::warn!(
            %method, %path, status = status.as_u16(), elapsed_ms = elapsed.as_millis(), correlation_id,
            "request completed"
        );
    } else {
        tracing::debug!(
            %method, %path, status = status.as_u16(), elapsed_ms = elapsed.as_millis(), correlation_id,
            "request completed"
        );
    }

    response
}

/// Turns a handler panic into the documented 500 `InternalError` rather
/// than tearing down the connection. Paired with `tower_http::catch_panic`
/// at the router layer, this just supplies the response body shape.
pub fn panic_response(_err: Box<dyn std::any::Any + Send>) -> Response {
    render_error(&GatewayError::internal("handler panicked"), None)
}
