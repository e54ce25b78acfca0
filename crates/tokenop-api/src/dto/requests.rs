//! Inbound request bodies and query parameters.
//!
//! Validation here is the strict boundary described by the spec: missing
//! required fields, wrong `kind` strings, zero-address recipients, and
//! negative/non-numeric amounts are all rejected with `BadRequest` before
//! a single Chain Gateway call is made.

use serde::Deserialize;

use tokenop_types::TokenKind;

fn default_decimals() -> u8 {
    18
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub kind: TokenKind,
    pub name: String,
    pub symbol: String,
    /// Required for `Erc20`; ignored for `Erc721`.
    #[serde(default)]
    pub initial_supply: Option<String>,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// `metadataURI` for `Erc20`, `baseURI` for `Erc721` — the factory
    /// distinguishes the two only by which `create*` function is called.
    #[serde(default, alias = "baseURI", rename = "metadataURI")]
    pub metadata_uri: Option<String>,
    #[serde(default)]
    pub burnable: bool,
    #[serde(default)]
    pub pausable: bool,
    #[serde(default)]
    pub list_on_dex: bool,
}

impl DeployRequest {
    pub fn metadata_or_base_uri(&self) -> String {
        self.metadata_uri.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTokensQuery {
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    pub owner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetadataRequest {
    #[serde(rename = "metadataURI")]
    pub metadata_uri: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintRequest {
    pub to: String,
    /// Fungible amount as a decimal string; `None` for non-fungible mints.
    #[serde(default)]
    pub amount: Option<String>,
    /// Non-fungible metadata URI for the freshly minted unit; may be
    /// omitted (an empty URI is minted).
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRequest {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    #[serde(default)]
    pub from: Option<String>,
    pub to: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
}

/// Body for `POST /v1/tokens/estimate-fee` — describes a hypothetical new
/// deployment; shares its shape with [`DeployRequest`] but is never used
/// to actually submit a transaction.
pub type EstimateDeployFeeRequest = DeployRequest;

/// Body for `POST /v1/tokens/:id/estimate-fee` — a hypothetical re-deploy
/// of an already-known token, so only the one field the factory can't
/// already tell us (the supply to quote against) is accepted.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EstimateExistingFeeRequest {
    #[serde(default)]
    pub initial_supply: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_request_parses_erc20_body() {
        let body = r#"{"kind":"Erc20","name":"My Token","symbol":"MTK","initialSupply":"1000000","burnable":true,"pausable":true}"#;
        let req: DeployRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.kind, TokenKind::Erc20);
        assert_eq!(req.initial_supply.as_deref(), Some("1000000"));
        assert_eq!(req.decimals, 18);
        assert!(req.burnable);
        assert!(req.pausable);
    }

    #[test]
    fn deploy_request_rejects_missing_required_fields() {
        let body = r#"{"kind":"Erc20","name":"X"}"#;
        let result = serde_json::from_str::<DeployRequest>(body);
        assert!(result.is_err());
    }

    #[test]
    fn deploy_request_accepts_base_uri_alias_for_non_fungible() {
        let body = r#"{"kind":"Erc721","name":"Pass","symbol":"PASS","baseURI":"ipfs://x"}"#;
        let req: DeployRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.metadata_or_base_uri(), "ipfs://x");
    }

    #[test]
    fn deploy_request_rejects_unknown_kind() {
        let body = r#"{"kind":"Erc1155","name":"X","symbol":"Y"}"#;
        assert!(serde_json::from_str::<DeployRequest>(body).is_err());
    }
}
