//! Wire-facing response shapes. Domain types in `tokenop-types` stay
//! decoupled from the HTTP contract; these DTOs own the camelCase field
//! names and any formatting the wire contract requires.

use chrono::{DateTime, Utc};
use serde::Serialize;

use tokenop_chain::HealthInfo;
use tokenop_types::{FeeQuote, Token, TokenKind};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id: u64,
    pub kind: TokenKind,
    pub address: String,
    pub owner: String,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
    pub created_at: DateTime<Utc>,
    pub burnable: bool,
    pub pausable: bool,
    pub listed_on_dex: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl From<Token> for TokenResponse {
    fn from(token: Token) -> Self {
        Self {
            id: token.id,
            kind: token.kind,
            address: token.address,
            owner: token.owner,
            name: token.name,
            symbol: token.symbol,
            metadata_uri: token.metadata_uri,
            created_at: token.created_at,
            burnable: token.burnable,
            pausable: token.pausable,
            listed_on_dex: token.listed_on_dex,
            decimals: token.decimals,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeQuoteResponse {
    pub gas_limit: u64,
    /// Wei, as a decimal string — a `u128` cannot round-trip through a JSON
    /// number without risking precision loss in common JSON parsers.
    pub gas_price: String,
    pub gas_price_in_display_unit: String,
    pub estimated_cost: String,
}

impl From<FeeQuote> for FeeQuoteResponse {
    fn from(quote: FeeQuote) -> Self {
        Self {
            gas_limit: quote.gas_limit,
            gas_price: quote.gas_price.to_string(),
            gas_price_in_display_unit: quote.gas_price_in_display_unit,
            estimated_cost: quote.estimated_cost,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthyResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime: u64,
    pub blockchain: BlockchainInfo,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainInfo {
    pub connected: bool,
    pub block_number: u64,
    pub chain_id: u64,
    pub signer_address: String,
    pub factory_address: String,
}

impl From<HealthInfo> for BlockchainInfo {
    fn from(info: HealthInfo) -> Self {
        Self {
            connected: true,
            block_number: info.block_number,
            chain_id: info.chain_id,
            signer_address: info.signer_address,
            factory_address: info.factory_address,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnhealthyResponse {
    pub status: &'static str,
    pub error: String,
    pub request_id: String,
}
