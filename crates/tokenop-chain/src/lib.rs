//! Sole owner of the RPC connection, operator signer, and factory contract
//! binding — everything in the gateway that talks to the chain goes
//! through this crate.

pub mod abi;
pub mod address;
pub mod api;
pub mod config;
pub mod events;
pub mod gateway;

pub use address::{is_zero_address, parse_address};
pub use api::ChainGatewayApi;
pub use config::ChainConfig;
pub use gateway::{
    ChainGateway, DeployOutcome, FungibleDeployParams, GatewayProvider, HealthInfo,
    NonFungibleDeployParams, WriteOutcome,
};
