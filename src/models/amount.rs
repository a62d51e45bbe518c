//! Defines the fixed point money type used for bill amounts.

use std::{fmt::Display, iter::Sum, ops::Add, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A money amount with exactly two decimal places, stored as integer cents.
///
/// Bills carry amounts like `47.30` where float rounding would be
/// unacceptable, so arithmetic happens on the cent count.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Zero, the starting value for sums and the default recurring charge.
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from a cent count, e.g. `4730` for `47.30`.
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// The amount as a cent count.
    pub fn cents(self) -> i64 {
        self.0
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Whether the amount is zero or greater.
    pub fn is_non_negative(self) -> bool {
        self.0 >= 0
    }

    /// Parse a decimal string such as `"47.30"` into an amount.
    ///
    /// Accepts a comma as the decimal separator and at most two decimal
    /// places. Shorter fractions are padded, so `"47.3"` parses as `47.30`.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if `text` is not a decimal number with
    /// at most two decimal places.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAmount(text.to_string());

        let normalized = text.trim().replace(',', ".");
        let (sign, unsigned) = match normalized.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, normalized.as_str()),
        };

        let (whole, fraction) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }

        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole_cents = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .ok()
                .and_then(|whole| whole.checked_mul(100))
                .ok_or_else(invalid)?
        };

        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            2 => fraction.parse::<i64>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        let cents = whole_cents.checked_add(fraction_cents).ok_or_else(invalid)?;

        Ok(Self(sign * cents))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.abs();

        write!(f, "{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod amount_tests {
    use crate::Error;

    use super::Amount;

    #[test]
    fn parse_two_decimal_places() {
        assert_eq!(Amount::parse("47.30"), Ok(Amount::from_cents(4730)));
    }

    #[test]
    fn parse_pads_single_decimal_place() {
        assert_eq!(Amount::parse("47.3"), Ok(Amount::from_cents(4730)));
    }

    #[test]
    fn parse_whole_number() {
        assert_eq!(Amount::parse("47"), Ok(Amount::from_cents(4700)));
    }

    #[test]
    fn parse_comma_separator() {
        assert_eq!(Amount::parse("47,30"), Ok(Amount::from_cents(4730)));
    }

    #[test]
    fn parse_negative() {
        assert_eq!(Amount::parse("-0.50"), Ok(Amount::from_cents(-50)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for text in [
            "",
            "  ",
            "abc",
            "1.234",
            "1.2.3",
            "12e4",
            // Whole parts whose cent count does not fit in 64 bits.
            "922337203685477580",
            "99999999999999999999",
        ] {
            assert_eq!(
                Amount::parse(text),
                Err(Error::InvalidAmount(text.to_string())),
                "{text:?} should not parse",
            );
        }
    }

    #[test]
    fn display_pads_cents() {
        assert_eq!(Amount::from_cents(4705).to_string(), "47.05");
        assert_eq!(Amount::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Amount::ZERO.to_string(), "0.00");
    }

    #[test]
    fn sum_of_amounts() {
        let total: Amount = [Amount::from_cents(100), Amount::from_cents(250)]
            .into_iter()
            .sum();

        assert_eq!(total, Amount::from_cents(350));
    }
}
