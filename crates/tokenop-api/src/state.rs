//! Shared application state handed to every route handler.

use std::sync::Arc;

use tokenop_chain::ChainGatewayApi;
use tokenop_ledger::OperationLedger;
use tokenop_types::AuthCredential;

use tokenop_ingress::RateLimiter;

/// Everything a handler needs, cloned cheaply (all fields are `Arc`s) onto
/// each request via axum's `State` extractor.
///
/// `chain` is held behind the [`ChainGatewayApi`] trait object rather than
/// the concrete gateway so route handlers can be exercised against a mock
/// chain in tests without a live RPC node.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainGatewayApi>,
    pub ledger: Arc<OperationLedger>,
    pub auth: Arc<AuthCredential>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(
        chain: Arc<dyn ChainGatewayApi>,
        ledger: Arc<OperationLedger>,
        auth: Arc<AuthCredential>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            chain,
            ledger,
            auth,
            rate_limiter,
        }
    }
}
