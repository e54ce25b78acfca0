//! Canonical domain types for the Tokenization Operations Gateway.
//!
//! Zero dependencies on other gateway crates. Defines:
//!
//! - [`TokenKind`] / [`Token`]: the uniform token abstraction over the two
//!   on-chain standards.
//! - [`Operation`] / [`OperationKind`] / [`OperationStatus`]: the async
//!   operation lifecycle.
//! - [`FeeQuote`] / [`Balance`]: ephemeral, never-persisted read results.
//! - [`AuthCredential`]: the process-wide API-key set.
//! - [`GatewayError`]: the error taxonomy shared by every other crate.

pub mod amount;
pub mod auth;
pub mod balance;
pub mod error;
pub mod fee;
pub mod operation;
pub mod token;

pub use amount::{format_amount, parse_amount};
pub use auth::AuthCredential;
pub use balance::Balance;
pub use error::{GatewayError, Result};
pub use fee::FeeQuote;
pub use operation::{Operation, OperationKind, OperationPayload, OperationStatus};
pub use token::{Token, TokenKind};
