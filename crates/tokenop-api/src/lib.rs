//! Route handlers mapping the REST surface to Chain Gateway operations,
//! plus the unauthenticated health probe.
//!
//! [`build_router`] wires the full middleware pipeline onto every route
//! except `GET /v1/health`, which is mounted outside it entirely so it
//! stays reachable with the chain unhealthy, unauthenticated, and over
//! the rate-limit budget (spec invariant P8).

pub mod dto;
pub mod envelope;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::extract::{Extension, Request};
use axum::middleware;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tokenop_ingress::{
    assign_correlation_id, authenticate, cap_body_size, log_request, panic_response, rate_limit,
    render_error_for, security_headers,
};
use tokenop_types::GatewayError;

pub use state::AppState;

/// Assemble the full `axum` router: the health probe mounted bare, every
/// other route behind correlation id → security headers → request
/// logging → body cap → rate limit → auth, in that order (outermost
/// first), plus CORS and panic recovery at the very edge.
pub fn build_router(state: AppState) -> Router {
    let auth = Arc::clone(&state.auth);
    let rate_limiter = Arc::clone(&state.rate_limiter);

    // `ServiceBuilder` applies the *last* `.layer()` call as the outermost
    // wrapper, so this list is built innermost-first to read, top to
    // bottom, as the reverse of execution order.
    let protected = routes::token_routes().layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn(authenticate))
            .layer(Extension(auth))
            .layer(middleware::from_fn(rate_limit))
            .layer(Extension(rate_limiter))
            .layer(middleware::from_fn(cap_body_size))
            .layer(middleware::from_fn(log_request))
            .layer(middleware::from_fn(security_headers)),
    );

    let health = Router::new().route("/v1/health", get(handlers::health::health));

    Router::new()
        .merge(health)
        .merge(protected)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(assign_correlation_id))
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(panic_response)),
        )
        .with_state(state)
}

/// Catches any request that matches none of the routes above and renders
/// the same error envelope every other rejection uses.
async fn not_found(req: Request) -> Response {
    render_error_for(&req, &GatewayError::not_found("Not found"))
}
