//! Per-(token, address) balance snapshots — never cached, read fresh on
//! every query.

use serde::{Deserialize, Serialize};

use crate::amount::format_amount;

/// A balance snapshot, shaped differently for the two token standards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Balance {
    Fungible {
        symbol: String,
        decimals: u8,
        /// Raw atomic integer balance, as a decimal string (may exceed
        /// JSON-safe integer range).
        balance: String,
        formatted: String,
    },
    NonFungible {
        symbol: String,
        /// Number of units owned.
        units: u64,
    },
}

impl Balance {
    pub fn fungible(symbol: impl Into<String>, decimals: u8, atomic_balance: u128) -> Self {
        Self::Fungible {
            symbol: symbol.into(),
            decimals,
            balance: atomic_balance.to_string(),
            formatted: format_amount(atomic_balance, decimals),
        }
    }

    pub fn non_fungible(symbol: impl Into<String>, units: u64) -> Self {
        Self::NonFungible {
            symbol: symbol.into(),
            units,
        }
    }
}
