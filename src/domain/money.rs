use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Parse a decimal string into a monetary amount.
/// Example: "50.00" -> 50.00, "12.5" -> 12.50, "100" -> 100.00
/// More than 2 decimal places are truncated, never rounded up.
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::InvalidFormat);
    }

    // Accept a bare leading decimal point, like ".50"
    let normalized = match (input.strip_prefix('.'), input.strip_prefix("-.")) {
        (Some(fraction), _) => format!("0.{}", fraction),
        (_, Some(fraction)) => format!("-0.{}", fraction),
        _ => input.to_string(),
    };

    let amount = Decimal::from_str(&normalized).map_err(|_| ParseAmountError::InvalidFormat)?;
    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::ToZero))
}

/// Format an amount with exactly two decimal places.
/// Example: 50 -> "50.00", -12.3 -> "-12.30"
pub fn format_amount(amount: Decimal) -> String {
    let mut amount = amount;
    amount.rescale(2);
    amount.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("50.00"), Ok(dec!(50.00)));
        assert_eq!(parse_amount("50"), Ok(dec!(50)));
        assert_eq!(parse_amount("12.34"), Ok(dec!(12.34)));
        assert_eq!(parse_amount("12.5"), Ok(dec!(12.5)));
        assert_eq!(parse_amount("0.01"), Ok(dec!(0.01)));
        assert_eq!(parse_amount(".50"), Ok(dec!(0.50)));
        assert_eq!(parse_amount("-50.00"), Ok(dec!(-50.00)));
        assert_eq!(parse_amount("  50.00  "), Ok(dec!(50.00)));
    }

    #[test]
    fn test_parse_amount_truncates_extra_places() {
        assert_eq!(parse_amount("100.999"), Ok(dec!(100.99)));
        assert_eq!(parse_amount("0.019"), Ok(dec!(0.01)));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.34.56").is_err());
        assert!(parse_amount("").is_err());
        assert!(parse_amount("€50").is_err());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(50)), "50.00");
        assert_eq!(format_amount(dec!(12.34)), "12.34");
        assert_eq!(format_amount(dec!(1)), "1.00");
        assert_eq!(format_amount(dec!(0.01)), "0.01");
        assert_eq!(format_amount(dec!(0)), "0.00");
        assert_eq!(format_amount(dec!(-50)), "-50.00");
        assert_eq!(format_amount(dec!(-0.01)), "-0.01");
    }
}
