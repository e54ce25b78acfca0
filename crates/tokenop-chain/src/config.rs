//! Configuration needed to construct a [`crate::gateway::ChainGateway`].
//!
//! Parsing and fail-fast validation of the surrounding env vars lives in
//! the bootstrap service; this struct is the typed value C1 hands to C2
//! once every required field is known to be present.

use std::time::Duration;

/// Everything the Chain Gateway needs to talk to exactly one RPC node and
/// sign as exactly one operator identity against exactly one factory.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Raw hex operator private key, as handed over by the key provider.
    pub operator_private_key: String,
    pub factory_address: String,
    /// Upper bound on how long receipt-waiting blocks before the
    /// operation is marked Failed and `UpstreamTimeout` is returned.
    pub receipt_timeout: Duration,
}

impl ChainConfig {
    pub fn new(
        rpc_url: impl Into<String>,
        chain_id: u64,
        operator_private_key: impl Into<String>,
        factory_address: impl Into<String>,
        receipt_timeout: Duration,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
            operator_private_key: operator_private_key.into(),
            factory_address: factory_address.into(),
            receipt_timeout,
        }
    }
}
