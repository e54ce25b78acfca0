//! Address parsing shared between the chain gateway and its callers.
//!
//! Lives here rather than in `tokenop-types` because it returns the native
//! `alloy` `Address` type, which that crate deliberately has no dependency
//! on (see its crate-level docs).

use alloy::primitives::Address;

use tokenop_types::{GatewayError, Result};

/// Parse a `0x`-prefixed hex address, rejecting malformed input as a
/// `BadRequest` rather than an internal error — this is ingress-facing
/// validation, not a chain-level concern.
pub fn parse_address(input: &str) -> Result<Address> {
    input
        .parse::<Address>()
        .map_err(|_| GatewayError::bad_request(format!("'{input}' is not a valid address")))
}

pub fn is_zero_address(address: &Address) -> bool {
    address.is_zero()
}
