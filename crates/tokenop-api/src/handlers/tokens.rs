//! Route handlers for the `/v1/tokens` surface.
//!
//! Every handler validates its input synchronously, invokes exactly one
//! Chain Gateway operation, and wraps the result in one of the three fixed
//! envelopes. Validation failures never reach the Chain Gateway.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;

use tokenop_chain::{is_zero_address, parse_address, FungibleDeployParams, NonFungibleDeployParams};
use tokenop_ledger::OperationLedger;
use tokenop_types::{GatewayError, Operation, OperationKind, OperationPayload, Result, Token, TokenKind};

use tokenop_ingress::{render_error, CorrelationId};

use crate::dto::requests::{
    BurnRequest, DeployRequest, EstimateDeployFeeRequest, EstimateExistingFeeRequest,
    ListTokensQuery, MintRequest, TransferRequest, UpdateMetadataRequest,
};
use crate::dto::responses::{FeeQuoteResponse, TokenResponse};
use crate::envelope::{AsyncOperationEnvelope, PaginatedEnvelope, ResourceEnvelope};
use crate::state::AppState;

/// Parse a JSON body into `T`, surfacing malformed or missing-field
/// payloads as `BadRequest` rather than letting axum's built-in rejection
/// (a different wire shape) leak through.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    if body.is_empty() {
        return Err(GatewayError::bad_request("request body is required"));
    }
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::bad_request(format!("malformed request body: {e}")))
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatewayError::bad_request(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_non_zero_address(field: &str, value: &str) -> Result<()> {
    let address = parse_address(value)?;
    if is_zero_address(&address) {
        return Err(GatewayError::bad_request(format!(
            "{field} must not be the zero address"
        )));
    }
    Ok(())
}

/// Cheap shape check on an amount/unit-id string, independent of a token's
/// decimals (which aren't known until the Chain Gateway looks the token
/// up) — rejects negative and non-numeric input at the ingress boundary.
fn require_numeric(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GatewayError::bad_request(format!("{field} must not be empty")));
    }
    if trimmed.starts_with('-') {
        return Err(GatewayError::bad_request(format!("{field} must not be negative")));
    }
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let numeric = !int_part.is_empty()
        && int_part.chars().all(|c| c.is_ascii_digit())
        && frac_part.chars().all(|c| c.is_ascii_digit());
    if !numeric {
        return Err(GatewayError::bad_request(format!("{field} is not a number")));
    }
    Ok(())
}

async fn finish(cid: &CorrelationId, result: Result<Response>) -> Response {
    match result {
        Ok(response) => response,
        Err(err) => render_error(&err, Some(cid)),
    }
}

fn token_resource(token: Token) -> Response {
    (StatusCode::OK, Json(ResourceEnvelope::new(TokenResponse::from(token)))).into_response()
}

/// Move an operation already `Pending` in the ledger through its terminal
/// transition based on the chain outcome, then render it as the
/// async-operation envelope. The operation is inserted as `Pending` by the
/// caller before the chain call is made, so this only ever updates an
/// existing entry in place.
fn record_operation<T: serde::Serialize>(
    ledger: &OperationLedger,
    operation_id: &str,
    tx_hash: String,
    confirmed: bool,
    block_number: Option<u64>,
    payload_data: T,
) -> Result<Response> {
    ledger.mark_submitted(operation_id, tx_hash)?;
    if confirmed {
        ledger.mark_confirmed(operation_id, block_number.unwrap_or_default().max(1))?;
    } else {
        ledger.mark_failed(operation_id)?;
    }
    let operation = ledger
        .get(operation_id)
        .ok_or_else(|| GatewayError::internal("operation vanished from the ledger"))?;
    let envelope = AsyncOperationEnvelope::from_operation(&operation, payload_data);
    Ok((StatusCode::CREATED, Json(envelope)).into_response())
}

/// Move an operation the ledger already tracks to `Failed` after a Chain
/// Gateway call errors out, recording the broadcast hash first when the
/// error carries one (a timeout after a successful broadcast), then hand
/// the original error back so the caller's `?` still short-circuits.
fn record_failed_operation(ledger: &OperationLedger, operation_id: &str, err: GatewayError) -> GatewayError {
    if let GatewayError::UpstreamTimeout { tx_hash: Some(tx_hash) } = &err {
        let _ = ledger.mark_submitted(operation_id, tx_hash.clone());
    }
    let _ = ledger.mark_failed(operation_id);
    err
}

pub async fn deploy_token(
    State(state): State<AppState>,
    cid: CorrelationId,
    body: Bytes,
) -> Response {
    finish(&cid, deploy_token_inner(state, body).await).await
}

async fn deploy_token_inner(state: AppState, body: Bytes) -> Result<Response> {
    let req: DeployRequest = parse_body(&body)?;
    require_non_empty("name", &req.name)?;
    require_non_empty("symbol", &req.symbol)?;

    match req.kind {
        TokenKind::Erc20 => {
            let initial_supply = req
                .initial_supply
                .clone()
                .ok_or_else(|| GatewayError::bad_request("initialSupply is required for Erc20"))?;
            require_numeric("initialSupply", &initial_supply)?;

            let params = FungibleDeployParams {
                name: req.name,
                symbol: req.symbol,
                initial_supply,
                decimals: req.decimals,
                metadata_uri: req.metadata_or_base_uri(),
                burnable: req.burnable,
                pausable: req.pausable,
                list_on_dex: req.list_on_dex,
            };
            let provisional_id = state.ledger.next_operation_id(OperationKind::Deploy, 0);
            state.ledger.insert(Operation::new(
                provisional_id.clone(),
                OperationKind::Deploy,
                OperationPayload::Deploy {
                    token_id: None,
                    token_address: None,
                },
                None,
            ));
            let outcome = state
                .chain
                .create_fungible(params)
                .await
                .map_err(|e| record_failed_operation(&state.ledger, &provisional_id, e))?;
            let operation_id = finalize_deploy_id(&state.ledger, &provisional_id, &outcome);
            record_operation(
                &state.ledger,
                &operation_id,
                outcome.tx_hash,
                outcome.confirmed,
                outcome.block_number,
                serde_json::json!({
                    "tokenId": outcome.token_id.map(|id| id.to_string()),
                    "tokenAddress": outcome.token_address,
                }),
            )
        }
        TokenKind::Erc721 => {
            let params = NonFungibleDeployParams {
                name: req.name,
                symbol: req.symbol,
                base_uri: req.metadata_or_base_uri(),
                burnable: req.burnable,
            };
            let provisional_id = state.ledger.next_operation_id(OperationKind::Deploy, 0);
            state.ledger.insert(Operation::new(
                provisional_id.clone(),
                OperationKind::Deploy,
                OperationPayload::Deploy {
                    token_id: None,
                    token_address: None,
                },
                None,
            ));
            let outcome = state
                .chain
                .create_non_fungible(params)
                .await
                .map_err(|e| record_failed_operation(&state.ledger, &provisional_id, e))?;
            let operation_id = finalize_deploy_id(&state.ledger, &provisional_id, &outcome);
            record_operation(
                &state.ledger,
                &operation_id,
                outcome.tx_hash,
                outcome.confirmed,
                outcome.block_number,
                serde_json::json!({
                    "tokenId": outcome.token_id.map(|id| id.to_string()),
                    "tokenAddress": outcome.token_address,
                }),
            )
        }
    }
}

/// Once a deploy outcome is known, move the provisional ledger entry to its
/// final id (the token id itself, per [`OperationLedger::deploy_operation_id`])
/// and fill in the real payload. Falls back to the provisional id when the
/// outcome didn't yield a token id (e.g. the deploy reverted on-chain).
fn finalize_deploy_id(
    ledger: &OperationLedger,
    provisional_id: &str,
    outcome: &tokenop_chain::DeployOutcome,
) -> String {
    let Some(token_id) = outcome.token_id else {
        return provisional_id.to_string();
    };
    let final_id = OperationLedger::deploy_operation_id(token_id);
    ledger.rekey(provisional_id, &final_id);
    let _ = ledger.set_payload(
        &final_id,
        OperationPayload::Deploy {
            token_id: Some(token_id),
            token_address: outcome.token_address.clone(),
        },
    );
    final_id
}

pub async fn list_tokens(
    State(state): State<AppState>,
    cid: CorrelationId,
    Query(query): Query<ListTokensQuery>,
) -> Response {
    finish(&cid, list_tokens_inner(state, query).await).await
}

async fn list_tokens_inner(state: AppState, query: ListTokensQuery) -> Result<Response> {
    if let Some(owner) = query.owner {
        require_non_zero_address("owner", &owner)?;
        let tokens = state.chain.get_owner_tokens(&owner).await?;
        let items: Vec<TokenResponse> = tokens.into_iter().map(TokenResponse::from).collect();
        return Ok((StatusCode::OK, Json(PaginatedEnvelope::single_page(items))).into_response());
    }

    let limit = query.limit.unwrap_or(100).clamp(1, 500);
    let offset = query.offset.unwrap_or(0);
    let (tokens, total) = state.chain.list_tokens(limit, offset).await?;
    let items: Vec<TokenResponse> = tokens.into_iter().map(TokenResponse::from).collect();
    Ok((
        StatusCode::OK,
        Json(PaginatedEnvelope::new(items, total, limit, offset)),
    )
        .into_response())
}

pub async fn get_token(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
) -> Response {
    finish(&cid, get_token_inner(state, token_id).await).await
}

async fn get_token_inner(state: AppState, token_id: u64) -> Result<Response> {
    let token = state.chain.get_token_info(token_id).await?;
    Ok(token_resource(token))
}

pub async fn update_metadata(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
    body: Bytes,
) -> Response {
    finish(&cid, update_metadata_inner(state, token_id, body).await).await
}

async fn update_metadata_inner(state: AppState, token_id: u64, body: Bytes) -> Result<Response> {
    let req: UpdateMetadataRequest = parse_body(&body)?;
    require_non_empty("metadataURI", &req.metadata_uri)?;

    let operation_id = state.ledger.next_operation_id(OperationKind::UpdateMetadata, token_id);
    state.ledger.insert(Operation::new(
        operation_id.clone(),
        OperationKind::UpdateMetadata,
        OperationPayload::MetadataUpdate {
            uri: req.metadata_uri.clone(),
        },
        None,
    ));
    let outcome = state
        .chain
        .update_metadata(token_id, &req.metadata_uri)
        .await
        .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({ "metadataURI": req.metadata_uri }),
    )
}

pub async fn get_balance(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path((token_id, address)): Path<(u64, String)>,
) -> Response {
    finish(&cid, get_balance_inner(state, token_id, address).await).await
}

async fn get_balance_inner(state: AppState, token_id: u64, address: String) -> Result<Response> {
    parse_address(&address)?;
    let balance = state.chain.get_balance(token_id, &address).await?;
    Ok((StatusCode::OK, Json(ResourceEnvelope::new(balance))).into_response())
}

pub async fn estimate_fee_for_token(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
    body: Bytes,
) -> Response {
    finish(&cid, estimate_fee_for_token_inner(state, token_id, body).await).await
}

async fn estimate_fee_for_token_inner(state: AppState, token_id: u64, body: Bytes) -> Result<Response> {
    let req: EstimateExistingFeeRequest = if body.is_empty() {
        EstimateExistingFeeRequest::default()
    } else {
        parse_body(&body)?
    };

    let token = state.chain.get_token_info(token_id).await?;
    let quote = match token.kind {
        TokenKind::Erc20 => {
            let decimals = token
                .decimals
                .ok_or_else(|| GatewayError::internal("fungible token missing decimals"))?;
            let initial_supply = req.initial_supply.unwrap_or_else(|| "0".to_string());
            require_numeric("initialSupply", &initial_supply)?;
            let params = FungibleDeployParams {
                name: token.name,
                symbol: token.symbol,
                initial_supply,
                decimals,
                metadata_uri: token.metadata_uri,
                burnable: token.burnable,
                pausable: token.pausable,
                list_on_dex: token.listed_on_dex,
            };
            state.chain.estimate_fungible_deploy_fee(&params).await?
        }
        TokenKind::Erc721 => {
            let params = NonFungibleDeployParams {
                name: token.name,
                symbol: token.symbol,
                base_uri: token.metadata_uri,
                burnable: token.burnable,
            };
            state.chain.estimate_non_fungible_deploy_fee(&params).await?
        }
    };

    Ok((
        StatusCode::OK,
        Json(ResourceEnvelope::new(FeeQuoteResponse::from(quote))),
    )
        .into_response())
}

pub async fn estimate_fee_for_new_deployment(
    State(state): State<AppState>,
    cid: CorrelationId,
    body: Bytes,
) -> Response {
    finish(&cid, estimate_fee_for_new_deployment_inner(state, body).await).await
}

async fn estimate_fee_for_new_deployment_inner(state: AppState, body: Bytes) -> Result<Response> {
    let req: EstimateDeployFeeRequest = parse_body(&body)?;
    require_non_empty("name", &req.name)?;
    require_non_empty("symbol", &req.symbol)?;

    let quote = match req.kind {
        TokenKind::Erc20 => {
            let initial_supply = req
                .initial_supply
                .clone()
                .ok_or_else(|| GatewayError::bad_request("initialSupply is required for Erc20"))?;
            require_numeric("initialSupply", &initial_supply)?;
            let params = FungibleDeployParams {
                name: req.name,
                symbol: req.symbol,
                initial_supply,
                decimals: req.decimals,
                metadata_uri: req.metadata_or_base_uri(),
                burnable: req.burnable,
                pausable: req.pausable,
                list_on_dex: req.list_on_dex,
            };
            state.chain.estimate_fungible_deploy_fee(&params).await?
        }
        TokenKind::Erc721 => {
            let params = NonFungibleDeployParams {
                name: req.name,
                symbol: req.symbol,
                base_uri: req.metadata_or_base_uri(),
                burnable: req.burnable,
            };
            state.chain.estimate_non_fungible_deploy_fee(&params).await?
        }
    };

    Ok((
        StatusCode::OK,
        Json(ResourceEnvelope::new(FeeQuoteResponse::from(quote))),
    )
        .into_response())
}

pub async fn mint(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
    body: Bytes,
) -> Response {
    finish(&cid, mint_inner(state, token_id, body).await).await
}

async fn mint_inner(state: AppState, token_id: u64, body: Bytes) -> Result<Response> {
    let req: MintRequest = parse_body(&body)?;
    require_non_zero_address("to", &req.to)?;

    let token = state.chain.get_token_info(token_id).await?;
    let amount_or_uri = if token.kind.is_fungible() {
        let amount = req
            .amount
            .clone()
            .ok_or_else(|| GatewayError::bad_request("amount is required to mint a fungible token"))?;
        require_numeric("amount", &amount)?;
        amount
    } else {
        req.uri.clone().unwrap_or_default()
    };

    let operation_id = state.ledger.next_operation_id(OperationKind::Mint, token_id);
    let payload = if token.kind.is_fungible() {
        OperationPayload::Mint {
            to: req.to.clone(),
            amount: Some(amount_or_uri.clone()),
            unit_id: None,
        }
    } else {
        OperationPayload::Mint {
            to: req.to.clone(),
            amount: None,
            unit_id: None,
        }
    };
    state
        .ledger
        .insert(Operation::new(operation_id.clone(), OperationKind::Mint, payload, None));
    let outcome = state
        .chain
        .mint(token_id, &req.to, &amount_or_uri)
        .await
        .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({ "to": req.to, "amount": req.amount, "uri": req.uri }),
    )
}

pub async fn burn(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
    body: Bytes,
) -> Response {
    finish(&cid, burn_inner(state, token_id, body).await).await
}

async fn burn_inner(state: AppState, token_id: u64, body: Bytes) -> Result<Response> {
    let req: BurnRequest = parse_body(&body)?;
    let token = state.chain.get_token_info(token_id).await?;

    let amount_or_unit_id = if token.kind.is_fungible() {
        let amount = req
            .amount
            .clone()
            .ok_or_else(|| GatewayError::bad_request("amount is required to burn a fungible token"))?;
        require_numeric("amount", &amount)?;
        amount
    } else {
        let unit_id = req
            .unit_id
            .clone()
            .ok_or_else(|| GatewayError::bad_request("unitId is required to burn a non-fungible unit"))?;
        require_numeric("unitId", &unit_id)?;
        unit_id
    };

    let operation_id = state.ledger.next_operation_id(OperationKind::Burn, token_id);
    state.ledger.insert(Operation::new(
        operation_id.clone(),
        OperationKind::Burn,
        OperationPayload::Burn {
            amount: req.amount.clone(),
            unit_id: req.unit_id.clone(),
        },
        None,
    ));
    let outcome = state
        .chain
        .burn(token_id, &amount_or_unit_id)
        .await
        .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({ "amount": req.amount, "unitId": req.unit_id }),
    )
}

pub async fn transfer(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
    body: Bytes,
) -> Response {
    finish(&cid, transfer_inner(state, token_id, body).await).await
}

async fn transfer_inner(state: AppState, token_id: u64, body: Bytes) -> Result<Response> {
    let req: TransferRequest = parse_body(&body)?;
    require_non_zero_address("to", &req.to)?;
    if let Some(from) = &req.from {
        require_non_zero_address("from", from)?;
    }

    let token = state.chain.get_token_info(token_id).await?;
    let amount_or_unit_id = if token.kind.is_fungible() {
        let amount = req
            .amount
            .clone()
            .ok_or_else(|| GatewayError::bad_request("amount is required to transfer a fungible token"))?;
        require_numeric("amount", &amount)?;
        amount
    } else {
        let unit_id = req
            .unit_id
            .clone()
            .ok_or_else(|| GatewayError::bad_request("unitId is required to transfer a non-fungible unit"))?;
        require_numeric("unitId", &unit_id)?;
        unit_id
    };

    let operation_id = state.ledger.next_operation_id(OperationKind::Transfer, token_id);
    state.ledger.insert(Operation::new(
        operation_id.clone(),
        OperationKind::Transfer,
        OperationPayload::Transfer {
            from: req.from.clone(),
            to: req.to.clone(),
            amount: req.amount.clone(),
            unit_id: req.unit_id.clone(),
        },
        None,
    ));
    let outcome = state
        .chain
        .transfer(token_id, req.from.as_deref(), &req.to, &amount_or_unit_id)
        .await
        .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({
            "from": req.from,
            "to": req.to,
            "amount": req.amount,
            "unitId": req.unit_id,
        }),
    )
}

pub async fn pause(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
) -> Response {
    finish(&cid, toggle_pause(state, token_id, true).await).await
}

pub async fn unpause(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
) -> Response {
    finish(&cid, toggle_pause(state, token_id, false).await).await
}

async fn toggle_pause(state: AppState, token_id: u64, pausing: bool) -> Result<Response> {
    let kind = if pausing { OperationKind::Pause } else { OperationKind::Unpause };
    let operation_id = state.ledger.next_operation_id(kind, token_id);
    state
        .ledger
        .insert(Operation::new(operation_id.clone(), kind, OperationPayload::Empty {}, None));
    let outcome = if pausing {
        state.chain.pause(token_id).await
    } else {
        state.chain.unpause(token_id).await
    }
    .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({}),
    )
}

pub async fn list_on_dex(
    State(state): State<AppState>,
    cid: CorrelationId,
    Path(token_id): Path<u64>,
) -> Response {
    finish(&cid, list_on_dex_inner(state, token_id).await).await
}

async fn list_on_dex_inner(state: AppState, token_id: u64) -> Result<Response> {
    let operation_id = state.ledger.next_operation_id(OperationKind::ListOnDex, token_id);
    state.ledger.insert(Operation::new(
        operation_id.clone(),
        OperationKind::ListOnDex,
        OperationPayload::Empty {},
        None,
    ));
    let outcome = state
        .chain
        .list_on_dex(token_id)
        .await
        .map_err(|e| record_failed_operation(&state.ledger, &operation_id, e))?;
    record_operation(
        &state.ledger,
        &operation_id,
        outcome.tx_hash,
        outcome.confirmed,
        outcome.block_number,
        serde_json::json!({}),
    )
}
