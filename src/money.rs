//! Helpers for parsing and displaying monetary amounts.
//!
//! Amounts are held as [Decimal] everywhere inside the crate so that sums are
//! penny-exact. Conversion to `f64` happens only at the display boundary.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::Error;

/// Parse user-submitted text as a decimal amount.
///
/// # Errors
/// Returns [Error::InvalidBalance] if `text` is not a finite decimal number.
pub fn parse_amount(text: &str) -> Result<Decimal, Error> {
    Decimal::from_str(text.trim()).map_err(|_| Error::InvalidBalance(text.to_owned()))
}

/// Convert an exact decimal amount to a plain number for display.
pub fn to_display(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod parse_amount_tests {
    use rust_decimal::Decimal;

    use crate::Error;

    use super::parse_amount;

    #[test]
    fn parses_plain_decimals() {
        assert_eq!(parse_amount("100.00"), Ok(Decimal::new(10000, 2)));
        assert_eq!(parse_amount("-5"), Ok(Decimal::new(-5, 0)));
        assert_eq!(parse_amount(" 0.10 "), Ok(Decimal::new(10, 2)));
    }

    #[test]
    fn rejects_text_that_is_not_a_number() {
        assert_eq!(
            parse_amount("lots"),
            Err(Error::InvalidBalance("lots".to_owned()))
        );
        assert_eq!(parse_amount(""), Err(Error::InvalidBalance(String::new())));
    }

    #[test]
    fn rejects_non_finite_values() {
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
    }
}
