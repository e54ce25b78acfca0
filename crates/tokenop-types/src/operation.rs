//! Async operation records — the lifecycle of a single gateway-initiated
//! on-chain action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result};

/// Verb tag for a gateway-initiated on-chain action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum OperationKind {
    Deploy,
    Mint,
    Burn,
    Transfer,
    Pause,
    Unpause,
    UpdateMetadata,
    ListOnDex,
}

/// Lifecycle state of an [`Operation`].
///
/// Transitions are monotone: `Pending -> Submitted -> {Confirmed, Failed}`.
/// `Confirmed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum OperationStatus {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    /// Whether `self -> next` is an allowed transition per the state machine.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Submitted)
                | (Self::Pending, Self::Failed)
                | (Self::Submitted, Self::Confirmed)
                | (Self::Submitted, Self::Failed)
        )
    }
}

/// Verb-specific structured data carried by an [`Operation`].
///
/// Serialized flat (untagged) into the async-operation envelope's `data`
/// field; never deserialized from the wire, so the untagged ambiguity that
/// would otherwise make round-tripping fragile is not a concern here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OperationPayload {
    Deploy {
        #[serde(rename = "tokenId", skip_serializing_if = "Option::is_none")]
        token_id: Option<u64>,
        #[serde(rename = "tokenAddress", skip_serializing_if = "Option::is_none")]
        token_address: Option<String>,
    },
    Mint {
        to: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<String>,
        #[serde(rename = "unitId", skip_serializing_if = "Option::is_none")]
        unit_id: Option<String>,
    },
    Burn {
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<String>,
        #[serde(rename = "unitId", skip_serializing_if = "Option::is_none")]
        unit_id: Option<String>,
    },
    Transfer {
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        to: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        amount: Option<String>,
        #[serde(rename = "unitId", skip_serializing_if = "Option::is_none")]
        unit_id: Option<String>,
    },
    MetadataUpdate {
        uri: String,
    },
    Empty {},
}

/// An async record of one gateway-initiated on-chain action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    pub operation_id: String,
    pub status: OperationStatus,
    pub tx_hash: Option<String>,
    pub block_number: Option<u64>,
    pub kind: OperationKind,
    pub payload: OperationPayload,
    pub external_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Operation {
    pub fn new(
        operation_id: String,
        kind: OperationKind,
        payload: OperationPayload,
        external_id: Option<String>,
    ) -> Self {
        Self {
            operation_id,
            status: OperationStatus::Pending,
            tx_hash: None,
            block_number: None,
            kind,
            payload,
            external_id,
            created_at: Utc::now(),
        }
    }

    /// Move to `Submitted`, recording the broadcast transaction hash.
    ///
    /// `tx_hash` is set at most once per the ledger invariants; calling this
    /// twice on the same operation is a programming error in the caller.
    pub fn mark_submitted(&mut self, tx_hash: String) -> Result<()> {
        self.transition(OperationStatus::Submitted)?;
        self.tx_hash = Some(tx_hash);
        Ok(())
    }

    /// Move to `Confirmed`, recording the block the transaction landed in.
    pub fn mark_confirmed(&mut self, block_number: u64) -> Result<()> {
        if block_number == 0 {
            return Err(GatewayError::internal(
                "confirmed operation must carry a non-zero block number",
            ));
        }
        self.transition(OperationStatus::Confirmed)?;
        self.block_number = Some(block_number);
        Ok(())
    }

    /// Move to `Failed` from any non-terminal state.
    pub fn mark_failed(&mut self) -> Result<()> {
        self.transition(OperationStatus::Failed)
    }

    fn transition(&mut self, next: OperationStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(GatewayError::internal(format!(
                "illegal operation transition {:?} -> {:?}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}
