//! Sole owner of the RPC connection, the operator signing identity, and the
//! token-factory contract binding.
//!
//! Every write operation acquires the submission lease — a single-slot
//! `tokio::sync::Mutex<()>` held only across nonce-acquire → sign →
//! broadcast — before it is dropped so receipt waiting never blocks other
//! in-flight submissions. Reads never touch the lease.

use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, U256};
use alloy::providers::fillers::{ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller, WalletFiller};
use alloy::providers::{Identity, PendingTransactionBuilder, Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::Log;
use alloy::signers::local::PrivateKeySigner;
use tokio::sync::Mutex as AsyncMutex;
use tracing::instrument;

use tokenop_types::{parse_amount, Balance, FeeQuote, GatewayError, Result, Token, TokenKind};

use crate::abi::{IFungibleToken, INonFungibleToken, ITokenFactory};
use crate::address::parse_address;
use crate::config::ChainConfig;
use crate::events;

type RecommendedFillers = JoinFill<GasFiller, JoinFill<NonceFiller, ChainIdFiller>>;

/// The fully composed provider: HTTP transport wrapped in the standard
/// gas/nonce/chain-id filler stack plus a wallet filler that signs every
/// outbound transaction with the operator key.
pub type GatewayProvider = FillProvider<
    JoinFill<JoinFill<Identity, RecommendedFillers>, WalletFiller<EthereumWallet>>,
    RootProvider,
>;

type FactoryContract = ITokenFactory::ITokenFactoryInstance<GatewayProvider>;

/// Everything the `deploy` operations need, gathered up front so the
/// gateway methods don't carry eight positional parameters.
pub struct FungibleDeployParams {
    pub name: String,
    pub symbol: String,
    pub initial_supply: String,
    pub decimals: u8,
    pub metadata_uri: String,
    pub burnable: bool,
    pub pausable: bool,
    pub list_on_dex: bool,
}

pub struct NonFungibleDeployParams {
    pub name: String,
    pub symbol: String,
    pub base_uri: String,
    pub burnable: bool,
}

/// Outcome of any write operation that waits for a receipt.
pub struct WriteOutcome {
    pub tx_hash: String,
    /// `true` iff the receipt's status field equals 1.
    pub confirmed: bool,
    pub block_number: Option<u64>,
    logs: Vec<Log>,
}

/// [`WriteOutcome`] plus the fields only a deploy call populates.
pub struct DeployOutcome {
    pub tx_hash: String,
    pub confirmed: bool,
    pub block_number: Option<u64>,
    pub token_id: Option<u64>,
    pub token_address: Option<String>,
}

/// Snapshot returned by [`ChainGateway::health_check`].
pub struct HealthInfo {
    pub block_number: u64,
    pub chain_id: u64,
    pub signer_address: String,
    pub factory_address: String,
}

pub struct ChainGateway {
    provider: GatewayProvider,
    factory: FactoryContract,
    factory_address: Address,
    signer_address: Address,
    chain_id: u64,
    receipt_timeout: Duration,
    submission_lease: AsyncMutex<()>,
    started_at: Instant,
}

impl ChainGateway {
    /// Build the provider, signer, and factory binding from config.
    ///
    /// Constructing the HTTP transport never makes a network call, so an
    /// unreachable RPC endpoint does not fail this step — it surfaces
    /// later, as an unhealthy [`ChainGateway::health_check`].
    pub fn connect(config: ChainConfig) -> Result<Self> {
        let signer = PrivateKeySigner::from_str(config.operator_private_key.trim())
            .map_err(|e| GatewayError::internal(format!("invalid operator private key: {e}")))?
            .with_chain_id(Some(config.chain_id));
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let rpc_url = config
            .rpc_url
            .parse()
            .map_err(|e| GatewayError::internal(format!("invalid RPC url: {e}")))?;

        let provider: GatewayProvider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .connect_http(rpc_url);

        let factory_address = parse_address(&config.factory_address)?;
        let factory = ITokenFactory::new(factory_address, provider.clone());

        Ok(Self {
            provider,
            factory,
            factory_address,
            signer_address,
            chain_id: config.chain_id,
            receipt_timeout: config.receipt_timeout,
            submission_lease: AsyncMutex::new(()),
            started_at: Instant::now(),
        })
    }

    /// Bind the on-chain fungible child contract for `address`.
    fn fungible_at(&self, address: Address) -> IFungibleToken::IFungibleTokenInstance<GatewayProvider> {
        IFungibleToken::new(address, self.provider.clone())
    }

    /// Bind the on-chain non-fungible child contract for `address`.
    fn non_fungible_at(&self, address: Address) -> INonFungibleToken::INonFungibleTokenInstance<GatewayProvider> {
        INonFungibleToken::new(address, self.provider.clone())
    }

    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<HealthInfo> {
        let block_number = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
        Ok(HealthInfo {
            block_number,
            chain_id,
            signer_address: format!("{:#x}", self.signer_address),
            factory_address: format!("{:#x}", self.factory_address),
        })
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    #[instrument(skip(self, params), fields(operation = "deploy", kind = "erc20"))]
    pub async fn create_fungible(&self, params: FungibleDeployParams) -> Result<DeployOutcome> {
        let supply_atomic = parse_amount(&params.initial_supply, params.decimals)?;
        let factory = self.factory.clone();
        let outcome = self
            .submit_and_await(move || async move {
                factory
                    .createERC20(
                        params.name,
                        params.symbol,
                        U256::from(supply_atomic),
                        params.metadata_uri,
                        params.burnable,
                        params.pausable,
                        params.list_on_dex,
                    )
                    .send()
                    .await
            })
            .await?;
        Ok(Self::deploy_outcome_from(outcome))
    }

    #[instrument(skip(self, params), fields(operation = "deploy", kind = "erc721"))]
    pub async fn create_non_fungible(&self, params: NonFungibleDeployParams) -> Result<DeployOutcome> {
        let factory = self.factory.clone();
        let outcome = self
            .submit_and_await(move || async move {
                factory
                    .createERC721(params.name, params.symbol, params.base_uri, params.burnable)
                    .send()
                    .await
            })
            .await?;
        Ok(Self::deploy_outcome_from(outcome))
    }

    fn deploy_outcome_from(outcome: WriteOutcome) -> DeployOutcome {
        let deployed = events::find_token_created(&outcome.logs);
        DeployOutcome {
            tx_hash: outcome.tx_hash,
            confirmed: outcome.confirmed && deployed.is_some(),
            block_number: outcome.block_number,
            token_id: deployed.as_ref().map(|d| d.token_id),
            token_address: deployed.map(|d| d.token_address),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_token_info(&self, token_id: u64) -> Result<Token> {
        let info = self
            .factory
            .getTokenInfo(U256::from(token_id))
            .call()
            .await
            .map_err(|e| GatewayError::not_found(format!("token {token_id}: {e}")))?;

        let kind = TokenKind::from_tag(info.kindTag)
            .ok_or_else(|| GatewayError::internal(format!("unknown token kind tag {}", info.kindTag)))?;

        let decimals = if kind.is_fungible() {
            let child = self.fungible_at(info.tokenAddress);
            let decimals = child
                .decimals()
                .call()
                .await
                .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
            Some(decimals)
        } else {
            None
        };

        let created_at = chrono::DateTime::from_timestamp(info.createdAt.to::<i64>(), 0)
            .unwrap_or_else(chrono::Utc::now);

        Ok(Token {
            id: token_id,
            kind,
            address: format!("{:#x}", info.tokenAddress),
            owner: format!("{:#x}", info.owner),
            name: info.name,
            symbol: info.symbol,
            metadata_uri: info.metadataURI,
            created_at,
            burnable: info.burnable,
            pausable: info.pausable,
            listed_on_dex: info.listedOnDex,
            decimals,
        })
    }

    /// `offset+1 ..= min(offset+limit, total)`, 1-based factory ids.
    #[instrument(skip(self))]
    pub async fn list_tokens(&self, limit: u32, offset: u64) -> Result<(Vec<Token>, u64)> {
        let limit = limit.clamp(1, 500) as u64;
        let total = self
            .factory
            .tokenCount()
            .call()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?
            .to::<u64>();

        let start = offset.saturating_add(1);
        let end = (offset.saturating_add(limit)).min(total);

        let mut items = Vec::new();
        let mut id = start;
        while id <= end {
            items.push(self.get_token_info(id).await?);
            id += 1;
        }
        Ok((items, total))
    }

    #[instrument(skip(self))]
    pub async fn get_owner_tokens(&self, owner: &str) -> Result<Vec<Token>> {
        let owner_address = parse_address(owner)?;
        let ids = self
            .factory
            .getOwnerTokens(owner_address)
            .call()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;

        let mut tokens = Vec::with_capacity(ids.len());
        for id in ids {
            tokens.push(self.get_token_info(id.to::<u64>()).await?);
        }
        Ok(tokens)
    }

    #[instrument(skip(self, to, amount_or_uri))]
    pub async fn mint(&self, token_id: u64, to: &str, amount_or_uri: &str) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        let to_address = parse_address(to)?;
        let token_address = parse_address(&token.address)?;

        if token.kind.is_fungible() {
            let decimals = token
                .decimals
                .ok_or_else(|| GatewayError::internal("fungible token missing decimals"))?;
            let atomic = parse_amount(amount_or_uri, decimals)?;
            let child = self.fungible_at(token_address);
            self.submit_and_await(move || async move {
                child.mint(to_address, U256::from(atomic)).send().await
            })
            .await
        } else {
            let uri = amount_or_uri.to_string();
            let child = self.non_fungible_at(token_address);
            self.submit_and_await(move || async move { child.mint(to_address, uri).send().await })
                .await
        }
    }

    #[instrument(skip(self, amount_or_unit_id))]
    pub async fn burn(&self, token_id: u64, amount_or_unit_id: &str) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        let token_address = parse_address(&token.address)?;

        if token.kind.is_fungible() {
            if !token.burnable {
                return Err(GatewayError::conflict("token is not burnable"));
            }
            let decimals = token
                .decimals
                .ok_or_else(|| GatewayError::internal("fungible token missing decimals"))?;
            let atomic = parse_amount(amount_or_unit_id, decimals)?;
            let child = self.fungible_at(token_address);
            self.submit_and_await(move || async move { child.burn(U256::from(atomic)).send().await })
                .await
        } else {
            if !token.burnable {
                return Err(GatewayError::conflict("token is not burnable"));
            }
            let unit_id = U256::from_str(amount_or_unit_id)
                .map_err(|_| GatewayError::bad_request("unitId must be a non-negative integer"))?;
            let child = self.non_fungible_at(token_address);
            self.submit_and_await(move || async move { child.burn(unit_id).send().await })
                .await
        }
    }

    #[instrument(skip(self, from, to, amount_or_unit_id))]
    pub async fn transfer(
        &self,
        token_id: u64,
        from: Option<&str>,
        to: &str,
        amount_or_unit_id: &str,
    ) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        let token_address = parse_address(&token.address)?;
        let to_address = parse_address(to)?;

        if token.kind.is_fungible() {
            let decimals = token
                .decimals
                .ok_or_else(|| GatewayError::internal("fungible token missing decimals"))?;
            let atomic = parse_amount(amount_or_unit_id, decimals)?;
            let child = self.fungible_at(token_address);
            self.submit_and_await(move || async move {
                child.transfer(to_address, U256::from(atomic)).send().await
            })
            .await
        } else {
            let from_address = match from {
                Some(addr) => parse_address(addr)?,
                None => self.signer_address,
            };
            let unit_id = U256::from_str(amount_or_unit_id)
                .map_err(|_| GatewayError::bad_request("unitId must be a non-negative integer"))?;
            let child = self.non_fungible_at(token_address);
            self.submit_and_await(move || async move {
                child.transferFrom(from_address, to_address, unit_id).send().await
            })
            .await
        }
    }

    #[instrument(skip(self))]
    pub async fn pause(&self, token_id: u64) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        self.require_pausable(&token)?;
        let child = self.fungible_at(parse_address(&token.address)?);
        self.submit_and_await(move || async move { child.pause().send().await }).await
    }

    #[instrument(skip(self))]
    pub async fn unpause(&self, token_id: u64) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        self.require_pausable(&token)?;
        let child = self.fungible_at(parse_address(&token.address)?);
        self.submit_and_await(move || async move { child.unpause().send().await }).await
    }

    fn require_pausable(&self, token: &Token) -> Result<()> {
        if !token.kind.is_fungible() {
            return Err(GatewayError::conflict("only fungible tokens are pausable"));
        }
        if !token.pausable {
            return Err(GatewayError::conflict("token is not pausable"));
        }
        Ok(())
    }

    #[instrument(skip(self, uri))]
    pub async fn update_metadata(&self, token_id: u64, uri: &str) -> Result<WriteOutcome> {
        let uri = uri.to_string();
        let factory = self.factory.clone();
        self.submit_and_await(move || async move {
            factory.updateMetadataURI(U256::from(token_id), uri).send().await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn list_on_dex(&self, token_id: u64) -> Result<WriteOutcome> {
        let token = self.get_token_info(token_id).await?;
        if !token.kind.is_fungible() {
            return Err(GatewayError::conflict("only fungible tokens can be listed"));
        }
        let factory = self.factory.clone();
        self.submit_and_await(move || async move {
            factory.listOnETCSwap(U256::from(token_id)).send().await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_balance(&self, token_id: u64, address: &str) -> Result<Balance> {
        let token = self.get_token_info(token_id).await?;
        let holder = parse_address(address)?;
        let token_address = parse_address(&token.address)?;

        if token.kind.is_fungible() {
            let decimals = token
                .decimals
                .ok_or_else(|| GatewayError::internal("fungible token missing decimals"))?;
            let raw = self
                .fungible_at(token_address)
                .balanceOf(holder)
                .call()
                .await
                .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
            Ok(Balance::fungible(token.symbol, decimals, raw.to::<u128>()))
        } else {
            let units = self
                .non_fungible_at(token_address)
                .balanceOf(holder)
                .call()
                .await
                .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
            Ok(Balance::non_fungible(token.symbol, units.to::<u64>()))
        }
    }

    /// Estimate gas for a hypothetical `createERC20` call, applying the
    /// fixed +20% safety margin, and quote it against the current gas
    /// price.
    #[instrument(skip(self, params))]
    pub async fn estimate_fungible_deploy_fee(&self, params: &FungibleDeployParams) -> Result<FeeQuote> {
        let supply_atomic = parse_amount(&params.initial_supply, params.decimals)?;
        let call = self.factory.createERC20(
            params.name.clone(),
            params.symbol.clone(),
            U256::from(supply_atomic),
            params.metadata_uri.clone(),
            params.burnable,
            params.pausable,
            params.list_on_dex,
        );
        let raw_estimate = call
            .estimate_gas()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
        self.quote_fee(raw_estimate).await
    }

    #[instrument(skip(self, params))]
    pub async fn estimate_non_fungible_deploy_fee(&self, params: &NonFungibleDeployParams) -> Result<FeeQuote> {
        let call = self.factory.createERC721(
            params.name.clone(),
            params.symbol.clone(),
            params.base_uri.clone(),
            params.burnable,
        );
        let raw_estimate = call
            .estimate_gas()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
        self.quote_fee(raw_estimate).await
    }

    async fn quote_fee(&self, raw_estimate: u64) -> Result<FeeQuote> {
        let gas_limit = FeeQuote::apply_safety_margin(raw_estimate);
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;
        let estimated_cost = gas_price.saturating_mul(gas_limit as u128);
        Ok(FeeQuote {
            gas_limit,
            gas_price,
            gas_price_in_display_unit: tokenop_types::format_amount(gas_price, 9),
            estimated_cost: tokenop_types::format_amount(estimated_cost, 18),
        })
    }

    /// Hold the submission lease only across `build_and_send`, then await
    /// the receipt outside it so other submissions are never blocked on a
    /// slow confirmation.
    async fn submit_and_await<F, Fut>(&self, build_and_send: F) -> Result<WriteOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = alloy::contract::Result<PendingTransactionBuilder<Ethereum>>>,
    {
        let pending = {
            let _lease = self.submission_lease.lock().await;
            build_and_send()
                .await
                .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?
        };
        let tx_hash = format!("{:#x}", pending.tx_hash());

        let receipt = tokio::time::timeout(self.receipt_timeout, pending.get_receipt())
            .await
            .map_err(|_| GatewayError::UpstreamTimeout {
                tx_hash: Some(tx_hash.clone()),
            })?
            .map_err(|e| GatewayError::upstream_unavailable(e.to_string()))?;

        Ok(WriteOutcome {
            tx_hash,
            confirmed: receipt.status(),
            block_number: receipt.block_number,
            logs: receipt.inner.logs().to_vec(),
        })
    }
}
