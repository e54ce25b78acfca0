//! Token identity and state as known to the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The two on-chain token standards the factory can deploy.
///
/// No inheritance — every downstream branch point is an exhaustive match
/// on this tag rather than dynamic dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TokenKind {
    /// Divisible; has a `decimals` parameter; mint-to-amount, burn-amount,
    /// transfer-amount; optional pause; optional DEX listing.
    Erc20,
    /// Indivisible; has a base URI; mint-to emits a fresh child-unit id;
    /// burn-by-unit, transfer-by-unit.
    Erc721,
}

impl TokenKind {
    pub fn is_fungible(self) -> bool {
        matches!(self, Self::Erc20)
    }

    /// Decode the factory's `kindTag` event field (0 = fungible, 1 = non-fungible).
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Erc20),
            1 => Some(Self::Erc721),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            Self::Erc20 => 0,
            Self::Erc721 => 1,
        }
    }
}

/// Identity and state of a deployed child contract as known to the gateway.
///
/// Created by a deploy operation; mutated only by gateway-initiated calls
/// (metadata update, listing, pause state); never destroyed from the
/// gateway's perspective — burns affect balances, not token identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Monotonically increasing factory-assigned id, starts at 1, never reused.
    pub id: u64,
    pub kind: TokenKind,
    /// On-chain address of the deployed child contract (`0x`-prefixed hex).
    pub address: String,
    /// On-chain address that controls the child contract's privileged operations.
    pub owner: String,
    pub name: String,
    pub symbol: String,
    /// Mutable pointer to off-chain metadata.
    pub metadata_uri: String,
    /// Timestamp recorded by the factory.
    pub created_at: DateTime<Utc>,
    pub burnable: bool,
    pub pausable: bool,
    /// Fungible only; whether a post-deployment listing step has run.
    pub listed_on_dex: bool,
    /// Decimals for fungible tokens; `None` for non-fungible.
    pub decimals: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kind_round_trips_through_tag() {
        assert_eq!(TokenKind::from_tag(0), Some(TokenKind::Erc20));
        assert_eq!(TokenKind::from_tag(1), Some(TokenKind::Erc721));
        assert_eq!(TokenKind::from_tag(2), None);
        assert_eq!(TokenKind::Erc20.tag(), 0);
        assert_eq!(TokenKind::Erc721.tag(), 1);
    }

    #[test]
    fn fungibility_matches_kind() {
        assert!(TokenKind::Erc20.is_fungible());
        assert!(!TokenKind::Erc721.is_fungible());
    }
}
