//! Ephemeral fee-estimation results — never persisted.

use serde::{Deserialize, Serialize};

/// Safety margin applied to every gas estimate, expressed as numerator/100.
pub const GAS_SAFETY_MARGIN_NUM: u64 = 120;
pub const GAS_SAFETY_MARGIN_DEN: u64 = 100;

/// A fee quote returned by the fee-estimation endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeQuote {
    /// Estimated gas limit with the fixed +20% safety margin applied.
    pub gas_limit: u64,
    /// Current gas price in wei.
    pub gas_price: u128,
    /// Gas price formatted in the chain's native display unit (e.g. gwei).
    pub gas_price_in_display_unit: String,
    /// `gas_limit * gas_price`, formatted in native-currency units.
    pub estimated_cost: String,
}

impl FeeQuote {
    /// Apply the fixed +20% safety margin to a raw gas estimate using
    /// integer math (`estimate * 120 / 100`).
    pub fn apply_safety_margin(raw_estimate: u64) -> u64 {
        raw_estimate
            .saturating_mul(GAS_SAFETY_MARGIN_NUM)
            .saturating_div(GAS_SAFETY_MARGIN_DEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_margin_adds_twenty_percent() {
        assert_eq!(FeeQuote::apply_safety_margin(100_000), 120_000);
        assert_eq!(FeeQuote::apply_safety_margin(1), 1); // integer truncation at small scale
    }
}
