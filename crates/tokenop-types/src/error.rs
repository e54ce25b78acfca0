//! Gateway error taxonomy
//!
//! Every error that can reach the ingress boundary is one of these kinds.
//! `(status, name, exposable)` form the wire contract described in the
//! error-handling design; the message carried by `Internal` is never sent
//! to the caller unless `exposable` allows it.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Taxonomy of errors that can be returned at the HTTP boundary.
///
/// The variant names double as the wire `name` field (see [`GatewayError::name`]),
/// so renaming a variant changes the API contract.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),

    #[error("missing or unrecognised API key")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("rate limit exceeded")]
    RateLimitExceeded { retry_after_ms: u64 },

    #[error("{0}")]
    Internal(String),

    #[error("upstream RPC unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("transaction receipt not observed within the deadline")]
    UpstreamTimeout { tx_hash: Option<String> },
}

impl GatewayError {
    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::RateLimitExceeded { .. } => 429,
            Self::Internal(_) => 500,
            Self::UpstreamUnavailable(_) => 503,
            Self::UpstreamTimeout { .. } => 503,
        }
    }

    /// Wire `name` field — part of the API contract, never change without a version bump.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BadRequest",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound(_) => "NotFound",
            Self::Conflict(_) => "Conflict",
            Self::RateLimitExceeded { .. } => "RateLimitExceeded",
            Self::Internal(_) => "InternalError",
            Self::UpstreamUnavailable(_) => "UpstreamUnavailable",
            Self::UpstreamTimeout { .. } => "UpstreamTimeout",
        }
    }

    /// Whether the underlying message is safe to show to callers.
    ///
    /// Internal errors are never exposable: the detail is logged with the
    /// request's correlation id and the caller gets a generic message.
    pub fn exposable(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }

    /// Message to place in the wire response, redacted per `exposable`.
    pub fn public_message(&self) -> String {
        if self.exposable() {
            self.to_string()
        } else {
            "an internal error occurred".to_string()
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(GatewayError::bad_request("x").status_code(), 400);
        assert_eq!(GatewayError::Unauthorized.status_code(), 401);
        assert_eq!(GatewayError::not_found("token 9").status_code(), 404);
        assert_eq!(GatewayError::conflict("not pausable").status_code(), 409);
        assert_eq!(
            GatewayError::RateLimitExceeded { retry_after_ms: 500 }.status_code(),
            429
        );
        assert_eq!(GatewayError::internal("boom").status_code(), 500);
        assert_eq!(GatewayError::upstream_unavailable("down").status_code(), 503);
        assert_eq!(
            GatewayError::UpstreamTimeout { tx_hash: None }.status_code(),
            503
        );
    }

    #[test]
    fn internal_errors_are_redacted() {
        let err = GatewayError::internal("db row leaked secret");
        assert!(!err.exposable());
        assert_eq!(err.public_message(), "an internal error occurred");
    }

    #[test]
    fn exposable_errors_keep_their_message() {
        let err = GatewayError::bad_request("symbol is required");
        assert!(err.exposable());
        assert_eq!(err.public_message(), "symbol is required");
    }
}
