//! An in-memory stand-in for [`ChainGatewayApi`], driven entirely by
//! `std::sync::Mutex`-guarded maps rather than a live RPC node.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use tokenop_chain::{
    ChainGatewayApi, DeployOutcome, FungibleDeployParams, HealthInfo, NonFungibleDeployParams,
    WriteOutcome,
};
use tokenop_types::{format_amount, parse_amount, Balance, FeeQuote, GatewayError, Result, Token, TokenKind};

pub const OWNER: &str = "0x000000000000000000000000000000000000aa";

pub struct MockChainGateway {
    tokens: Mutex<HashMap<u64, Token>>,
    fungible_balances: Mutex<HashMap<(u64, String), u128>>,
    non_fungible_balances: Mutex<HashMap<(u64, String), u64>>,
    next_id: AtomicU64,
    next_unit_id: AtomicU64,
    unhealthy: Mutex<bool>,
    fail_next_mint_with_timeout: Mutex<Option<String>>,
}

impl MockChainGateway {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
            fungible_balances: Mutex::new(HashMap::new()),
            non_fungible_balances: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            next_unit_id: AtomicU64::new(0),
            unhealthy: Mutex::new(false),
            fail_next_mint_with_timeout: Mutex::new(None),
        }
    }

    pub fn set_unhealthy(&self, value: bool) {
        *self.unhealthy.lock().unwrap() = value;
    }

    /// The next `mint` call fails with `UpstreamTimeout` carrying `tx_hash`,
    /// as if broadcast had succeeded but the receipt never arrived.
    pub fn fail_next_mint_with_timeout(&self, tx_hash: impl Into<String>) {
        *self.fail_next_mint_with_timeout.lock().unwrap() = Some(tx_hash.into());
    }

    fn token(&self, token_id: u64) -> Result<Token> {
        self.tokens
            .lock()
            .unwrap()
            .get(&token_id)
            .cloned()
            .ok_or_else(|| GatewayError::not_found(format!("token {token_id}")))
    }

    fn next_tx_hash(&self) -> String {
        let seq = self.next_id.load(Ordering::Relaxed) + self.next_unit_id.load(Ordering::Relaxed);
        format!("0x{seq:064x}")
    }
}

impl Default for MockChainGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainGatewayApi for MockChainGateway {
    async fn health_check(&self) -> Result<HealthInfo> {
        if *self.unhealthy.lock().unwrap() {
            return Err(GatewayError::upstream_unavailable("mock RPC endpoint unreachable"));
        }
        Ok(HealthInfo {
            block_number: 1,
            chain_id: 31337,
            signer_address: OWNER.to_string(),
            factory_address: "0x000000000000000000000000000000000000ff".to_string(),
        })
    }

    fn uptime(&self) -> Duration {
        Duration::from_secs(42)
    }

    async fn create_fungible(&self, params: FungibleDeployParams) -> Result<DeployOutcome> {
        let supply = parse_amount(&params.initial_supply, params.decimals)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let address = format!("0x{id:040x}");

        let token = Token {
            id,
            kind: TokenKind::Erc20,
            address: address.clone(),
            owner: OWNER.to_string(),
            name: params.name,
            symbol: params.symbol,
            metadata_uri: params.metadata_uri,
            created_at: chrono::Utc::now(),
            burnable: params.burnable,
            pausable: params.pausable,
            listed_on_dex: params.list_on_dex,
            decimals: Some(params.decimals),
        };
        self.tokens.lock().unwrap().insert(id, token);
        self.fungible_balances
            .lock()
            .unwrap()
            .insert((id, OWNER.to_string()), supply);

        Ok(DeployOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(1),
            token_id: Some(id),
            token_address: Some(address),
        })
    }

    async fn create_non_fungible(&self, params: NonFungibleDeployParams) -> Result<DeployOutcome> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let address = format!("0x{id:040x}");

        let token = Token {
            id,
            kind: TokenKind::Erc721,
            address: address.clone(),
            owner: OWNER.to_string(),
            name: params.name,
            symbol: params.symbol,
            metadata_uri: params.base_uri,
            created_at: chrono::Utc::now(),
            burnable: params.burnable,
            pausable: false,
            listed_on_dex: false,
            decimals: None,
        };
        self.tokens.lock().unwrap().insert(id, token);

        Ok(DeployOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(1),
            token_id: Some(id),
            token_address: Some(address),
        })
    }

    async fn get_token_info(&self, token_id: u64) -> Result<Token> {
        self.token(token_id)
    }

    async fn list_tokens(&self, limit: u32, offset: u64) -> Result<(Vec<Token>, u64)> {
        let tokens = self.tokens.lock().unwrap();
        let total = tokens.len() as u64;
        let mut ids: Vec<u64> = tokens.keys().copied().collect();
        ids.sort_unstable();
        let items = ids
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|id| tokens.get(&id).unwrap().clone())
            .collect();
        Ok((items, total))
    }

    async fn get_owner_tokens(&self, owner: &str) -> Result<Vec<Token>> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens
            .values()
            .filter(|t| t.owner.eq_ignore_ascii_case(owner))
            .cloned()
            .collect())
    }

    async fn mint(&self, token_id: u64, to: &str, amount_or_uri: &str) -> Result<WriteOutcome> {
        if let Some(tx_hash) = self.fail_next_mint_with_timeout.lock().unwrap().take() {
            return Err(GatewayError::UpstreamTimeout { tx_hash: Some(tx_hash) });
        }
        let token = self.token(token_id)?;
        if token.kind.is_fungible() {
            let decimals = token.decimals.unwrap();
            let atomic = parse_amount(amount_or_uri, decimals)?;
            let mut balances = self.fungible_balances.lock().unwrap();
            *balances.entry((token_id, to.to_string())).or_insert(0) += atomic;
        } else {
            let unit_id = self.next_unit_id.fetch_add(1, Ordering::Relaxed) + 1;
            let mut balances = self.non_fungible_balances.lock().unwrap();
            *balances.entry((token_id, to.to_string())).or_insert(0) += 1;
            let _ = unit_id;
        }
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn burn(&self, token_id: u64, amount_or_unit_id: &str) -> Result<WriteOutcome> {
        let token = self.token(token_id)?;
        if !token.burnable {
            return Err(GatewayError::conflict("token is not burnable"));
        }
        if token.kind.is_fungible() {
            let decimals = token.decimals.unwrap();
            let atomic = parse_amount(amount_or_unit_id, decimals)?;
            let mut balances = self.fungible_balances.lock().unwrap();
            let entry = balances.entry((token_id, OWNER.to_string())).or_insert(0);
            *entry = entry.saturating_sub(atomic);
        }
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn transfer(
        &self,
        token_id: u64,
        from: Option<&str>,
        to: &str,
        amount_or_unit_id: &str,
    ) -> Result<WriteOutcome> {
        let token = self.token(token_id)?;
        let from = from.unwrap_or(OWNER).to_string();
        if token.kind.is_fungible() {
            let decimals = token.decimals.unwrap();
            let atomic = parse_amount(amount_or_unit_id, decimals)?;
            let mut balances = self.fungible_balances.lock().unwrap();
            let sender_balance = balances.entry((token_id, from.clone())).or_insert(0);
            if *sender_balance < atomic {
                return Err(GatewayError::conflict("insufficient balance"));
            }
            *sender_balance -= atomic;
            *balances.entry((token_id, to.to_string())).or_insert(0) += atomic;
        }
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn pause(&self, token_id: u64) -> Result<WriteOutcome> {
        self.token(token_id)?;
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn unpause(&self, token_id: u64) -> Result<WriteOutcome> {
        self.token(token_id)?;
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn update_metadata(&self, token_id: u64, uri: &str) -> Result<WriteOutcome> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .get_mut(&token_id)
            .ok_or_else(|| GatewayError::not_found(format!("token {token_id}")))?;
        token.metadata_uri = uri.to_string();
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn list_on_dex(&self, token_id: u64) -> Result<WriteOutcome> {
        let mut tokens = self.tokens.lock().unwrap();
        let token = tokens
            .get_mut(&token_id)
            .ok_or_else(|| GatewayError::not_found(format!("token {token_id}")))?;
        token.listed_on_dex = true;
        Ok(WriteOutcome {
            tx_hash: self.next_tx_hash(),
            confirmed: true,
            block_number: Some(2),
            logs: Vec::new(),
        })
    }

    async fn get_balance(&self, token_id: u64, address: &str) -> Result<Balance> {
        let token = self.token(token_id)?;
        if token.kind.is_fungible() {
            let decimals = token.decimals.unwrap();
            let atomic = *self
                .fungible_balances
                .lock()
                .unwrap()
                .get(&(token_id, address.to_string()))
                .unwrap_or(&0);
            Ok(Balance::fungible(token.symbol, decimals, atomic))
        } else {
            let units = *self
                .non_fungible_balances
                .lock()
                .unwrap()
                .get(&(token_id, address.to_string()))
                .unwrap_or(&0);
            Ok(Balance::non_fungible(token.symbol, units))
        }
    }

    async fn estimate_fungible_deploy_fee(&self, params: &FungibleDeployParams) -> Result<FeeQuote> {
        let _ = parse_amount(&params.initial_supply, params.decimals)?;
        let gas_limit = FeeQuote::apply_safety_margin(120_000);
        Ok(FeeQuote {
            gas_limit,
            gas_price: 1_000_000_000,
            gas_price_in_display_unit: format_amount(1_000_000_000, 9),
            estimated_cost: format_amount(gas_limit as u128 * 1_000_000_000, 18),
        })
    }

    async fn estimate_non_fungible_deploy_fee(&self, _params: &NonFungibleDeployParams) -> Result<FeeQuote> {
        let gas_limit = FeeQuote::apply_safety_margin(150_000);
        Ok(FeeQuote {
            gas_limit,
            gas_price: 1_000_000_000,
            gas_price_in_display_unit: format_amount(1_000_000_000, 9),
            estimated_cost: format_amount(gas_limit as u128 * 1_000_000_000, 18),
        })
    }
}

pub fn build_test_state() -> tokenop_api::AppState {
    use std::sync::Arc;
    use tokenop_ingress::{RateLimitConfig, RateLimiter};
    use tokenop_ledger::OperationLedger;
    use tokenop_types::AuthCredential;

    tokenop_api::AppState::new(
        Arc::new(MockChainGateway::new()),
        Arc::new(OperationLedger::new(1_000)),
        Arc::new(AuthCredential::new(vec!["test-key".to_string()])),
        Arc::new(RateLimiter::new(RateLimitConfig::new(Duration::from_secs(60), 1_000))),
    )
}
