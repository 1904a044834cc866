//! Amount entry: keystroke sanitizing, range checks, and stroop conversion.

use thiserror::Error;

/// Fractional digits carried by a ledger amount.
pub const AMOUNT_DECIMALS: usize = 7;
/// Stroop conversion constant: 1 unit = 10,000,000 stroops.
pub const STROOPS_PER_UNIT: i128 = 10_000_000;
/// Largest amount accepted by the proposal form, in base units.
pub const MAX_AMOUNT: u64 = 1_000_000_000_000;

// Whole parts longer than this go through the f64 path instead of i128.
const MAX_EXACT_WHOLE_DIGITS: usize = 30;

/// User-facing verdicts for the amount field.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AmountValidationError {
    #[error("amount is required")]
    Required,
    /// Non-numeric text, or a value at or below zero.
    #[error("amount must be a positive number greater than 0")]
    NotPositive,
    #[error("amount exceeds maximum allowed value")]
    ExceedsMaximum,
    /// Committed text that the keystroke sanitizer would have rewritten.
    #[error("amount contains invalid characters")]
    InvalidCharacters,
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_i128_digits(s: &str) -> Option<i128> {
    if s.is_empty() {
        return Some(0);
    }
    s.parse::<i128>().ok()
}

/// Sanitize raw amount keystrokes into canonical form.
///
/// Keeps ASCII digits and the first `.`; later separators are dropped and
/// the fraction is truncated (never rounded) to [`AMOUNT_DECIMALS`] digits.
/// The result may be empty or end with a bare `.` while the user is typing.
pub fn format_amount(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let Some((whole, rest)) = cleaned.split_once('.') else {
        return cleaned;
    };

    let fraction: String = rest
        .chars()
        .filter(|c| *c != '.')
        .take(AMOUNT_DECIMALS)
        .collect();

    format!("{whole}.{fraction}")
}

/// Requiredness and range check for a stored amount string.
pub fn validate_amount(amount: &str) -> Result<(), AmountValidationError> {
    let s = amount.trim();
    if s.is_empty() {
        return Err(AmountValidationError::Required);
    }

    let value: f64 = s.parse().map_err(|_| AmountValidationError::NotPositive)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(AmountValidationError::NotPositive);
    }

    if value > MAX_AMOUNT as f64 {
        return Err(AmountValidationError::ExceedsMaximum);
    }

    // f64 cannot resolve a single stroop at the top of the range.
    let max_stroops = i128::from(MAX_AMOUNT) * STROOPS_PER_UNIT;
    if decimal_to_stroops(s).is_some_and(|stroops| stroops > max_stroops) {
        return Err(AmountValidationError::ExceedsMaximum);
    }

    Ok(())
}

/// Range check for an amount read from a finished record (a CSV cell).
///
/// Unlike form entry, nothing is sanitized: text that [`format_amount`]
/// would change, such as a sign or an exponent, is rejected.
pub fn validate_committed_amount(amount: &str) -> Result<(), AmountValidationError> {
    let s = amount.trim();
    if format_amount(s) != s {
        return Err(AmountValidationError::InvalidCharacters);
    }
    validate_amount(s)
}

/// Exact `floor(amount * 10^7)` for plain `[+-]digits[.digits]` text.
fn decimal_to_stroops(s: &str) -> Option<i128> {
    let (negative, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !all_digits(whole) || !all_digits(fraction) || whole.len() > MAX_EXACT_WHOLE_DIGITS {
        return None;
    }

    let whole_stroops = parse_i128_digits(whole)?.checked_mul(STROOPS_PER_UNIT)?;

    let (kept, dropped) = fraction.split_at(fraction.len().min(AMOUNT_DECIMALS));
    let mut padded = kept.to_string();
    while padded.len() < AMOUNT_DECIMALS {
        padded.push('0');
    }
    let fraction_stroops = parse_i128_digits(&padded)?;

    let magnitude = whole_stroops.checked_add(fraction_stroops)?;
    let truncated = dropped.bytes().any(|b| b != b'0');

    if negative {
        // Floor rounds away from zero for negatives.
        Some(-magnitude - i128::from(truncated))
    } else {
        Some(magnitude)
    }
}

/// Convert a decimal amount into an integer count of stroops.
///
/// Empty or non-numeric input yields `"0"`. Negative amounts are floored,
/// not rejected; run [`validate_amount`] first to keep them out.
pub fn to_smallest_unit(amount: &str) -> String {
    let s = amount.trim();
    if s.is_empty() {
        return "0".to_string();
    }

    if let Some(stroops) = decimal_to_stroops(s) {
        return stroops.to_string();
    }

    let scaled = match s.parse::<f64>() {
        Ok(value) => (value * STROOPS_PER_UNIT as f64).floor(),
        Err(_) => {
            tracing::debug!("amount is not numeric; converting to zero stroops");
            return "0".to_string();
        }
    };

    if !scaled.is_finite() || scaled == 0.0 {
        return "0".to_string();
    }
    format!("{scaled:.0}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_non_numeric_characters() {
        assert_eq!(format_amount("1,234.5 XLM"), "1234.5");
        assert_eq!(format_amount("-42"), "42");
        assert_eq!(format_amount("abc"), "");
    }

    #[test]
    fn truncates_fraction_without_rounding() {
        assert_eq!(format_amount("12.345678901"), "12.3456789");
        assert_eq!(format_amount("0.99999999"), "0.9999999");
    }

    #[test]
    fn keeps_only_first_separator() {
        assert_eq!(format_amount("1.2.3"), "1.23");
        assert_eq!(format_amount("..5"), ".5");
        assert_eq!(format_amount("1.2.3.4.5.6.7.8.9"), "1.2345678");
    }

    #[test]
    fn preserves_partial_entry() {
        assert_eq!(format_amount(""), "");
        assert_eq!(format_amount("5."), "5.");
        assert_eq!(format_amount("."), ".");
    }

    proptest! {
        #[test]
        fn format_is_idempotent(raw in ".*") {
            let once = format_amount(&raw);
            prop_assert_eq!(format_amount(&once), once);
        }

        #[test]
        fn format_output_is_canonical(raw in "[0-9.,a-z -]{0,40}") {
            let out = format_amount(&raw);
            prop_assert!(out.chars().all(|c| c.is_ascii_digit() || c == '.'));
            prop_assert!(out.matches('.').count() <= 1);
            if let Some((_, fraction)) = out.split_once('.') {
                prop_assert!(fraction.len() <= AMOUNT_DECIMALS);
            }
        }
    }

    #[test]
    fn blank_amount_is_required() {
        assert_eq!(validate_amount(""), Err(AmountValidationError::Required));
        assert_eq!(validate_amount("   "), Err(AmountValidationError::Required));
    }

    #[test]
    fn zero_and_garbage_are_not_positive() {
        assert_eq!(validate_amount("0"), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("0.0000000"), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("-3"), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("."), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("abc"), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("NaN"), Err(AmountValidationError::NotPositive));
        assert_eq!(validate_amount("inf"), Err(AmountValidationError::NotPositive));
    }

    #[test]
    fn accepts_amounts_in_range() {
        assert!(validate_amount("5").is_ok());
        assert!(validate_amount("0.0000001").is_ok());
        assert!(validate_amount(" 12.5 ").is_ok());
        assert!(validate_amount("1000000000000").is_ok());
    }

    #[test]
    fn rejects_amounts_above_maximum() {
        assert_eq!(
            validate_amount("1000000000001"),
            Err(AmountValidationError::ExceedsMaximum)
        );
        assert_eq!(
            validate_amount("1000000000000.0000001"),
            Err(AmountValidationError::ExceedsMaximum)
        );
    }

    #[test]
    fn maximum_agrees_with_stroop_conversion() {
        let at_max = format_amount("1000000000000.00000009");
        assert!(validate_amount(&at_max).is_ok());
        assert_eq!(to_smallest_unit(&at_max), "10000000000000000000");
    }

    #[test]
    fn committed_amounts_are_not_rewritten() {
        assert_eq!(
            validate_committed_amount("-5"),
            Err(AmountValidationError::InvalidCharacters)
        );
        assert_eq!(
            validate_committed_amount("1e3"),
            Err(AmountValidationError::InvalidCharacters)
        );
        assert_eq!(
            validate_committed_amount("1,000"),
            Err(AmountValidationError::InvalidCharacters)
        );
        assert_eq!(
            validate_committed_amount("1.123456789"),
            Err(AmountValidationError::InvalidCharacters)
        );
    }

    #[test]
    fn committed_amounts_share_range_messages() {
        assert!(validate_committed_amount(" 10.5 ").is_ok());
        assert_eq!(validate_committed_amount(""), Err(AmountValidationError::Required));
        assert_eq!(validate_committed_amount("0"), Err(AmountValidationError::NotPositive));
        assert_eq!(
            validate_committed_amount("1000000000001"),
            Err(AmountValidationError::ExceedsMaximum)
        );
    }

    #[test]
    fn error_messages_are_user_facing() {
        assert_eq!(AmountValidationError::Required.to_string(), "amount is required");
        assert_eq!(
            AmountValidationError::NotPositive.to_string(),
            "amount must be a positive number greater than 0"
        );
        assert_eq!(
            AmountValidationError::ExceedsMaximum.to_string(),
            "amount exceeds maximum allowed value"
        );
    }

    #[test]
    fn converts_to_stroops() {
        assert_eq!(to_smallest_unit("10.5"), "105000000");
        assert_eq!(to_smallest_unit("1"), "10000000");
        assert_eq!(to_smallest_unit("0.0000001"), "1");
        assert_eq!(to_smallest_unit(".5"), "5000000");
        assert_eq!(to_smallest_unit("5."), "50000000");
    }

    #[test]
    fn conversion_is_exact_for_decimal_text() {
        assert_eq!(to_smallest_unit("1.0000001"), "10000001");
        assert_eq!(to_smallest_unit("0.3"), "3000000");
        assert_eq!(to_smallest_unit("1000000000000"), "10000000000000000000");
    }

    #[test]
    fn conversion_floors_extra_precision() {
        assert_eq!(to_smallest_unit("1.00000009"), "10000000");
        assert_eq!(to_smallest_unit("-1.00000001"), "-10000001");
        assert_eq!(to_smallest_unit("-2.5"), "-25000000");
        assert_eq!(to_smallest_unit("-0"), "0");
    }

    #[test]
    fn unparseable_converts_to_zero() {
        assert_eq!(to_smallest_unit(""), "0");
        assert_eq!(to_smallest_unit("abc"), "0");
        assert_eq!(to_smallest_unit("."), "0");
        assert_eq!(to_smallest_unit("1.2.3"), "0");
        assert_eq!(to_smallest_unit("NaN"), "0");
        assert_eq!(to_smallest_unit("inf"), "0");
    }

    #[test]
    fn exponent_notation_uses_float_path() {
        assert_eq!(to_smallest_unit("1e3"), "10000000000");
        assert_eq!(to_smallest_unit("2.5E-1"), "2500000");
    }
}
