//! In-memory record of every gateway-submitted operation.

pub mod ledger;

pub use ledger::{OperationLedger, DEFAULT_CAPACITY};
