//! `GET /v1/health` — exempt from authentication and rate limiting.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use tokenop_ingress::CorrelationId;

use crate::dto::responses::{BlockchainInfo, HealthyResponse, UnhealthyResponse};
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn health(State(state): State<AppState>, correlation_id: CorrelationId) -> Response {
    let uptime = state.chain.uptime().as_secs();

    match state.chain.health_check().await {
        Ok(info) => (
            StatusCode::OK,
            Json(HealthyResponse {
                status: "healthy",
                version: VERSION,
                uptime,
                blockchain: BlockchainInfo::from(info),
                request_id: correlation_id.to_string(),
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(UnhealthyResponse {
                status: "unhealthy",
                error: err.to_string(),
                request_id: correlation_id.to_string(),
            }),
        )
            .into_response(),
    }
}
