//! Per-log isolated event decoding.
//!
//! A transaction receipt may carry logs this gateway doesn't recognise
//! (emitted by the child contract itself, or by some other contract touched
//! in the same block). Each log is decoded independently; a log that fails
//! to decode as the event we're looking for is silently skipped rather than
//! aborting the whole receipt-processing step.

use alloy::rpc::types::Log;
use alloy::sol_types::SolEvent;

use crate::abi::ITokenFactory::{MetadataURIUpdated, TokenCreated, TokenListedOnETCSwap};

/// Result of decoding a `TokenCreated` event out of a deploy receipt.
pub struct DeployedToken {
    pub token_id: u64,
    pub kind_tag: u8,
    pub token_address: String,
}

/// Scan `logs` for the first log that decodes as `TokenCreated`.
///
/// Returns `None` if no log in the receipt matches — the caller reports
/// the operation as Failed with null id/address fields per the receipt
/// contract, rather than treating a decode miss as a hard error.
pub fn find_token_created(logs: &[Log]) -> Option<DeployedToken> {
    decode_first::<TokenCreated>(logs).map(|event| DeployedToken {
        token_id: event.id.to::<u64>(),
        kind_tag: event.kindTag,
        token_address: format!("{:#x}", event.tokenAddress),
    })
}

/// Scan `logs` for a `TokenListedOnETCSwap` event; used only to confirm the
/// listing call landed, never to drive a decision.
pub fn find_token_listed(logs: &[Log]) -> Option<u64> {
    decode_first::<TokenListedOnETCSwap>(logs).map(|event| event.id.to::<u64>())
}

/// Scan `logs` for a `MetadataURIUpdated` event; used only to confirm the
/// update call landed.
pub fn find_metadata_updated(logs: &[Log]) -> Option<String> {
    decode_first::<MetadataURIUpdated>(logs).map(|event| event.uri)
}

fn decode_first<E>(logs: &[Log]) -> Option<E>
where
    E: SolEvent,
{
    for log in logs {
        if let Ok(decoded) = log.log_decode::<E>() {
            return Some(decoded.inner.data);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_set_yields_no_deployed_token() {
        assert!(find_token_created(&[]).is_none());
        assert!(find_token_listed(&[]).is_none());
        assert!(find_metadata_updated(&[]).is_none());
    }
}
