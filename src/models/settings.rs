//! Defines the singleton application settings and the billing day cutoff.

use serde::{Deserialize, Serialize};

use crate::{Error, models::Amount};

/// The day-of-month cutoff that decides which billing month a bill falls in.
///
/// Restricted to 1-28 so the cutoff exists in every month of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingDay(u8);

impl BillingDay {
    /// Create a billing day cutoff.
    ///
    /// # Errors
    /// Returns [Error::InvalidBillingDay] if `day` is outside 1-28.
    pub fn new(day: u8) -> Result<Self, Error> {
        if (1..=28).contains(&day) {
            Ok(Self(day))
        } else {
            Err(Error::InvalidBillingDay(day))
        }
    }

    /// Create a billing day cutoff without checking the range.
    ///
    /// Intended for values read back from the database, which were validated
    /// when they were written.
    pub fn new_unchecked(day: u8) -> Self {
        Self(day)
    }

    /// The cutoff as a day of month.
    pub fn get(self) -> u8 {
        self.0
    }
}

/// The application settings singleton.
///
/// Loaded once per operation and passed explicitly, so that the billing month
/// computation stays a pure function of its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// The fixed charge (e.g. rent) added on top of the utility bills of a
    /// billing month.
    pub recurring_charge: Amount,
    /// The day-of-month cutoff for attributing bills to billing months.
    pub billing_day: BillingDay,
    /// The year that reports default to.
    pub active_year: i32,
}

#[cfg(test)]
mod billing_day_tests {
    use crate::Error;

    use super::BillingDay;

    #[test]
    fn new_accepts_full_range() {
        assert_eq!(BillingDay::new(1).map(BillingDay::get), Ok(1));
        assert_eq!(BillingDay::new(28).map(BillingDay::get), Ok(28));
    }

    #[test]
    fn new_rejects_zero() {
        assert_eq!(BillingDay::new(0), Err(Error::InvalidBillingDay(0)));
    }

    #[test]
    fn new_rejects_days_missing_from_short_months() {
        assert_eq!(BillingDay::new(29), Err(Error::InvalidBillingDay(29)));
        assert_eq!(BillingDay::new(31), Err(Error::InvalidBillingDay(31)));
    }
}
