//! Trait seam over [`ChainGateway`](crate::gateway::ChainGateway).
//!
//! The HTTP surface crate depends on this trait rather than the concrete
//! gateway, so its route handlers can run against a mocked chain in tests
//! without a live RPC node.

use std::time::Duration;

use async_trait::async_trait;

use tokenop_types::{Balance, Result, Token};

use crate::gateway::{
    ChainGateway, DeployOutcome, FungibleDeployParams, HealthInfo, NonFungibleDeployParams,
    WriteOutcome,
};

#[async_trait]
pub trait ChainGatewayApi: Send + Sync {
    async fn health_check(&self) -> Result<HealthInfo>;
    fn uptime(&self) -> Duration;

    async fn create_fungible(&self, params: FungibleDeployParams) -> Result<DeployOutcome>;
    async fn create_non_fungible(&self, params: NonFungibleDeployParams) -> Result<DeployOutcome>;

    async fn get_token_info(&self, token_id: u64) -> Result<Token>;
    async fn list_tokens(&self, limit: u32, offset: u64) -> Result<(Vec<Token>, u64)>;
    async fn get_owner_tokens(&self, owner: &str) -> Result<Vec<Token>>;

    async fn mint(&self, token_id: u64, to: &str, amount_or_uri: &str) -> Result<WriteOutcome>;
    async fn burn(&self, token_id: u64, amount_or_unit_id: &str) -> Result<WriteOutcome>;
    async fn transfer(
        &self,
        token_id: u64,
        from: Option<&str>,
        to: &str,
        amount_or_unit_id: &str,
    ) -> Result<WriteOutcome>;
    async fn pause(&self, token_id: u64) -> Result<WriteOutcome>;
    async fn unpause(&self, token_id: u64) -> Result<WriteOutcome>;
    async fn update_metadata(&self, token_id: u64, uri: &str) -> Result<WriteOutcome>;
    async fn list_on_dex(&self, token_id: u64) -> Result<WriteOutcome>;

    async fn get_balance(&self, token_id: u64, address: &str) -> Result<Balance>;

    async fn estimate_fungible_deploy_fee(
        &self,
        params: &FungibleDeployParams,
    ) -> Result<tokenop_types::FeeQuote>;
    async fn estimate_non_fungible_deploy_fee(
        &self,
        params: &NonFungibleDeployParams,
    ) -> Result<tokenop_types::FeeQuote>;
}

#[async_trait]
impl ChainGatewayApi for ChainGateway {
    async fn health_check(&self) -> Result<HealthInfo> {
        ChainGateway::health_check(self).await
    }

    fn uptime(&self) -> Duration {
        ChainGateway::uptime(self)
    }

    async fn create_fungible(&self, params: FungibleDeployParams) -> Result<DeployOutcome> {
        ChainGateway::create_fungible(self, params).await
    }

    async fn create_non_fungible(&self, params: NonFungibleDeployParams) -> Result<DeployOutcome> {
        ChainGateway::create_non_fungible(self, params).await
    }

    async fn get_token_info(&self, token_id: u64) -> Result<Token> {
        ChainGateway::get_token_info(self, token_id).await
    }

    async fn list_tokens(&self, limit: u32, offset: u64) -> Result<(Vec<Token>, u64)> {
        ChainGateway::list_tokens(self, limit, offset).await
    }

    async fn get_owner_tokens(&self, owner: &str) -> Result<Vec<Token>> {
        ChainGateway::get_owner_tokens(self, owner).await
    }

    async fn mint(&self, token_id: u64, to: &str, amount_or_uri: &str) -> Result<WriteOutcome> {
        ChainGateway::mint(self, token_id, to, amount_or_uri).await
    }

    async fn burn(&self, token_id: u64, amount_or_unit_id: &str) -> Result<WriteOutcome> {
        ChainGateway::burn(self, token_id, amount_or_unit_id).await
    }

    async fn transfer(
        &self,
        token_id: u64,
        from: Option<&str>,
        to: &str,
        amount_or_unit_id: &str,
    ) -> Result<WriteOutcome> {
        ChainGateway::transfer(self, token_id, from, to, amount_or_unit_id).await
    }

    async fn pause(&self, token_id: u64) -> Result<WriteOutcome> {
        ChainGateway::pause(self, token_id).await
    }

    async fn unpause(&self, token_id: u64) -> Result<WriteOutcome> {
        ChainGateway::unpause(self, token_id).await
    }

    async fn update_metadata(&self, token_id: u64, uri: &str) -> Result<WriteOutcome> {
        ChainGateway::update_metadata(self, token_id, uri).await
    }

    async fn list_on_dex(&self, token_id: u64) -> Result<WriteOutcome> {
        ChainGateway::list_on_dex(self, token_id).await
    }

    async fn get_balance(&self, token_id: u64, address: &str) -> Result<Balance> {
        ChainGateway::get_balance(self, token_id, address).await
    }

    async fn estimate_fungible_deploy_fee(
        &self,
        params: &FungibleDeployParams,
    ) -> Result<tokenop_types::FeeQuote> {
        ChainGateway::estimate_fungible_deploy_fee(self, params).await
    }

    async fn estimate_non_fungible_deploy_fee(
        &self,
        params: &NonFungibleDeployParams,
    ) -> Result<tokenop_types::FeeQuote> {
        ChainGateway::estimate_non_fungible_deploy_fee(self, params).await
    }
}
