//! Process environment to typed, validated bootstrap configuration.
//!
//! [`Args`] accepts every field as optional so that [`Args::validate`] can
//! collect every missing required field into a single diagnostic instead
//! of clap's usual first-error-wins behaviour.

use std::time::Duration;

use clap::Parser;

use tokenop_chain::ChainConfig;

#[derive(Parser, Debug)]
#[command(name = "tokenop-gateway")]
#[command(author, version, about = "Tokenization Operations Gateway", long_about = None)]
pub struct Args {
    /// Host to bind the HTTP listener to.
    #[arg(long, env = "TOKENOP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind the HTTP listener to.
    #[arg(long, env = "TOKENOP_PORT", default_value_t = 3000)]
    pub port: u16,

    /// JSON-RPC endpoint of the chain the factory contract lives on.
    #[arg(long, env = "TOKENOP_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Chain id of the network behind `rpc_url`.
    #[arg(long, env = "TOKENOP_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Raw hex operator private key used to sign every submitted transaction.
    #[arg(long, env = "TOKENOP_OPERATOR_PRIVATE_KEY")]
    pub operator_private_key: Option<String>,

    /// Address of the token factory contract.
    #[arg(long, env = "TOKENOP_FACTORY_ADDRESS")]
    pub factory_address: Option<String>,

    /// Comma-separated list of accepted API keys. At least one is required.
    #[arg(long, env = "TOKENOP_API_KEYS")]
    pub api_keys: Option<String>,

    /// Sliding rate-limit window, in milliseconds.
    #[arg(long, env = "TOKENOP_RATE_LIMIT_WINDOW_MS", default_value_t = 60_000)]
    pub rate_limit_window_ms: u64,

    /// Maximum requests per API key per window.
    #[arg(long, env = "TOKENOP_RATE_LIMIT_MAX_REQUESTS", default_value_t = 100)]
    pub rate_limit_max_requests: u32,

    /// How long to wait for a transaction receipt before the operation is
    /// marked Failed and `UpstreamTimeout` is returned.
    #[arg(long, env = "TOKENOP_RECEIPT_TIMEOUT_SECS", default_value_t = 30)]
    pub receipt_timeout_secs: u64,

    /// Number of ledger entries retained before the oldest terminal entry
    /// is evicted.
    #[arg(long, env = "TOKENOP_LEDGER_CAPACITY", default_value_t = 10_000)]
    pub ledger_capacity: usize,

    /// How long, on SIGINT/SIGTERM, to let in-flight requests drain before
    /// the process exits.
    #[arg(long, env = "TOKENOP_SHUTDOWN_GRACE_SECS", default_value_t = 10)]
    pub shutdown_grace_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "TOKENOP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log format (json, pretty).
    #[arg(long, env = "TOKENOP_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Everything `main` needs after every required field has been confirmed
/// present, with `api_keys` already split and the duration fields already
/// converted.
pub struct BootstrapConfig {
    pub host: String,
    pub port: u16,
    pub chain: ChainConfig,
    pub api_keys: Vec<String>,
    pub rate_limit_window: Duration,
    pub rate_limit_max_requests: u32,
    pub ledger_capacity: usize,
    pub shutdown_grace: Duration,
}

impl Args {
    /// Collects every missing required field into one diagnostic rather
    /// than failing on the first one encountered.
    pub fn validate(self) -> Result<BootstrapConfig, Vec<String>> {
        let mut missing = Vec::new();

        if self.rpc_url.as_deref().unwrap_or("").is_empty() {
            missing.push("TOKENOP_RPC_URL (--rpc-url)".to_string());
        }
        if self.chain_id.is_none() {
            missing.push("TOKENOP_CHAIN_ID (--chain-id)".to_string());
        }
        if self.operator_private_key.as_deref().unwrap_or("").is_empty() {
            missing.push("TOKENOP_OPERATOR_PRIVATE_KEY (--operator-private-key)".to_string());
        }
        if self.factory_address.as_deref().unwrap_or("").is_empty() {
            missing.push("TOKENOP_FACTORY_ADDRESS (--factory-address)".to_string());
        }

        let api_keys: Vec<String> = self
            .api_keys
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect();
        if api_keys.is_empty() {
            missing.push("TOKENOP_API_KEYS (--api-keys): at least one key is required".to_string());
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        let chain = ChainConfig::new(
            self.rpc_url.unwrap(),
            self.chain_id.unwrap(),
            self.operator_private_key.unwrap(),
            self.factory_address.unwrap(),
            Duration::from_secs(self.receipt_timeout_secs),
        );

        Ok(BootstrapConfig {
            host: self.host,
            port: self.port,
            chain,
            api_keys,
            rate_limit_window: Duration::from_millis(self.rate_limit_window_ms),
            rate_limit_max_requests: self.rate_limit_max_requests,
            ledger_capacity: self.ledger_capacity,
            shutdown_grace: Duration::from_secs(self.shutdown_grace_secs),
        })
    }
}
