//! The `/v1` route table.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tokens;
use crate::state::AppState;

/// Everything under `/v1/tokens`, mounted behind the shared middleware
/// stack by [`crate::build_router`]. `GET /v1/health` is deliberately not
/// here — it is mounted separately, outside auth and rate limiting.
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tokens", post(tokens::deploy_token).get(tokens::list_tokens))
        .route("/v1/tokens/estimate-fee", post(tokens::estimate_fee_for_new_deployment))
        .route(
            "/v1/tokens/:id",
            get(tokens::get_token).patch(tokens::update_metadata),
        )
        .route("/v1/tokens/:id/balance/:address", get(tokens::get_balance))
        .route("/v1/tokens/:id/estimate-fee", post(tokens::estimate_fee_for_token))
        .route("/v1/tokens/:id/mint", post(tokens::mint))
        .route("/v1/tokens/:id/burn", post(tokens::burn))
        .route("/v1/tokens/:id/transfer", post(tokens::transfer))
        .route("/v1/tokens/:id/pause", post(tokens::pause))
        .route("/v1/tokens/:id/unpause", post(tokens::unpause))
        .route("/v1/tokens/:id/list-on-dex", post(tokens::list_on_dex))
}
