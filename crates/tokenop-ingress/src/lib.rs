//! Ingress middleware: everything a request passes through between the TCP
//! socket and a route handler, except for `GET /v1/health` which the
//! HTTP-surface crate mounts outside this pipeline entirely.
//!
//! Order applied (outermost first): correlation id, security headers,
//! request logging, body-size cap, rate limiting, API-key authentication.

pub mod client_ip;
pub mod correlation;
pub mod error_response;
pub mod middleware;
pub mod rate_limit;

pub use client_ip::extract_client_ip;
pub use correlation::{assign_correlation_id, CorrelationId, REQUEST_ID_HEADER};
pub use error_response::{render_error, render_error_for};
pub use middleware::{authenticate, cap_body_size, log_request, panic_response, rate_limit, security_headers};
pub use rate_limit::{RateLimitConfig, RateLimiter};
