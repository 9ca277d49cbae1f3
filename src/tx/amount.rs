//! Decimal amount validation and fee formatting.

use crate::tx::error::{WalletError, WalletResult};

/// Check that `amount` is a plain, strictly positive decimal string.
///
/// Accepted: `"1"`, `"1.0"`, `"0.0001"`. Rejected: signs, exponents,
/// whitespace, empty fractions (`"1."`) and any all-zero value.
pub fn validate_amount(amount: &str) -> WalletResult<()> {
    if is_positive_decimal(amount) {
        Ok(())
    } else {
        Err(WalletError::InvalidAmount(amount.to_string()))
    }
}

pub fn is_positive_decimal(amount: &str) -> bool {
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (amount, None),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }

    amount.bytes().any(|b| (b'1'..=b'9').contains(&b))
}

/// Render an integer amount of base units as a decimal string with trailing
/// zeros trimmed, e.g. `format_units(420_000_000_000_000, 18) == "0.00042"`.
pub fn format_units(value: u128, decimals: u32) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amounts() {
        for amount in ["1", "1.0", "0.0001", "1000000", "00.5"] {
            assert!(validate_amount(amount).is_ok(), "{amount} should be valid");
        }
    }

    #[test]
    fn test_rejected_amounts() {
        for amount in ["0", "0.0", "-1", "-0.5", "", ".5", "1.", "1e18", " 1", "abc", "+1", "1.2.3"] {
            assert_eq!(
                validate_amount(amount),
                Err(WalletError::InvalidAmount(amount.to_string())),
                "{amount:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(420_000_000_000_000, 18), "0.00042");
        assert_eq!(format_units(1_000_000_000_000_000_000, 18), "1");
        assert_eq!(format_units(1_500_000, 6), "1.5");
        assert_eq!(format_units(0, 18), "0");
        assert_eq!(format_units(42, 0), "42");
    }
}
