//! Fixed-point amount formatting for fungible token amounts.
//!
//! Every fungible amount crossing the API boundary is a decimal string;
//! internally it is converted to an atomic `u128` via `value * 10^decimals`,
//! truncating any fractional digits beyond the token's declared precision.

use crate::error::{GatewayError, Result};

/// Parse a decimal amount string into atomic units at the given precision.
///
/// Accepts an optional fractional part; fractional digits beyond `decimals`
/// are truncated rather than rejected. Negative amounts and non-numeric
/// input are rejected with `BadRequest`.
pub fn parse_amount(input: &str, decimals: u8) -> Result<u128> {
    let input = input.trim();
    if input.is_empty() {
        return Err(GatewayError::bad_request("amount must not be empty"));
    }
    if let Some(rest) = input.strip_prefix('-') {
        let _ = rest;
        return Err(GatewayError::bad_request("amount must not be negative"));
    }

    let (int_part, frac_part) = match input.split_once('.') {
        Some((i, f)) => (i, f),
        None => (input, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(GatewayError::bad_request("amount is not a number"));
    }
    let int_part = if int_part.is_empty() { "0" } else { int_part };

    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(GatewayError::bad_request("amount is not a number"));
    }

    let decimals = decimals as usize;
    let truncated_frac = if frac_part.len() > decimals {
        &frac_part[..decimals]
    } else {
        frac_part
    };
    let padded_frac = format!("{:0<width$}", truncated_frac, width = decimals);

    let combined = format!("{int_part}{padded_frac}");
    let combined = if combined.is_empty() { "0" } else { &combined };

    combined
        .parse::<u128>()
        .map_err(|_| GatewayError::bad_request("amount overflows atomic precision"))
}

/// Format atomic units back into a decimal string at the given precision,
/// normalising trailing zeros (but keeping at least one fractional digit
/// when the value is exactly representable as a whole number — `"500.0"`,
/// not `"500"`, matching the on-chain-balance convention used across the
/// gateway's API).
pub fn format_amount(value: u128, decimals: u8) -> String {
    let decimals = decimals as usize;
    if decimals == 0 {
        return value.to_string();
    }

    let divisor = 10u128.pow(decimals as u32);
    let int_part = value / divisor;
    let frac_part = value % divisor;

    let frac_str = format!("{:0width$}", frac_part, width = decimals);
    let trimmed = frac_str.trim_end_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };

    format!("{int_part}.{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_numbers() {
        assert_eq!(parse_amount("1000000", 18).unwrap(), 1_000_000 * 10u128.pow(18));
    }

    #[test]
    fn parses_fractional_amounts() {
        assert_eq!(parse_amount("500", 18).unwrap(), 500 * 10u128.pow(18));
        assert_eq!(parse_amount("0.5", 18).unwrap(), 5 * 10u128.pow(17));
    }

    #[test]
    fn truncates_excess_fractional_digits() {
        // decimals = 2, three fractional digits supplied: last digit dropped.
        assert_eq!(parse_amount("1.239", 2).unwrap(), 123);
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(parse_amount("-5", 18).is_err());
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("", 18).is_err());
    }

    #[test]
    fn formats_with_trailing_zero_normalisation() {
        assert_eq!(format_amount(500 * 10u128.pow(18), 18), "500.0");
        assert_eq!(format_amount(5 * 10u128.pow(17), 18), "0.5");
        assert_eq!(format_amount(123, 2), "1.23");
        assert_eq!(format_amount(0, 18), "0.0");
    }

    #[test]
    fn round_trips_through_parse_and_format() {
        let atomic = parse_amount("1234.5", 18).unwrap();
        assert_eq!(format_amount(atomic, 18), "1234.5");
    }
}
