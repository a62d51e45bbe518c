//! Pure calendar math for attributing bills to billing months.
//!
//! A bill received on or before the billing day cutoff is charged in the
//! month it arrived; a bill received after the cutoff rolls forward into the
//! next month so it can still be settled together with the next cycle. These
//! functions are total over well-formed dates and take the cutoff as an
//! argument so the result never depends on ambient state.

use time::{Date, Month};

use crate::{Error, models::BillingDay};

/// Truncate `date` to the first day of its month.
pub fn first_of_month(date: Date) -> Date {
    date.replace_day(1).expect("day 1 exists in every month")
}

/// The first day of the month immediately after the month of `date`.
///
/// Rolls over the year boundary, so December 2023 steps to January 2024.
pub fn next_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).expect("day 1 exists in every month")
}

/// The first day of the month immediately before the month of `date`.
///
/// Rolls over the year boundary, so January 2024 steps to December 2023.
pub fn prev_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::January => (date.year() - 1, Month::December),
        month => (date.year(), month.previous()),
    };

    Date::from_calendar_date(year, month, 1).expect("day 1 exists in every month")
}

/// The billing month a bill received on `received` is charged in.
///
/// Bills received on or before the `cutoff` day belong to the calendar month
/// of `received`, later bills belong to the following month.
pub fn billing_month_for(received: Date, cutoff: BillingDay) -> Date {
    let month = first_of_month(received);

    if received.day() <= cutoff.get() {
        month
    } else {
        next_month(month)
    }
}

/// The billing month that `today` falls in, under the same cutoff rule as
/// [billing_month_for].
pub fn current_billing_month(today: Date, cutoff: BillingDay) -> Date {
    billing_month_for(today, cutoff)
}

/// Parse a month given as text into the first day of that month.
///
/// Accepts `YYYY-MM`, `YYYY-MM-DD` (the day is discarded) and `MM-YYYY`, with
/// `-`, `/` or `.` as the separator.
///
/// # Errors
/// This function will return an [Error::InvalidMonthFormat] if `text` does not
/// name a valid month.
pub fn parse_month(text: &str) -> Result<Date, Error> {
    let invalid = || Error::InvalidMonthFormat(text.to_string());
    let parts: Vec<&str> = text.trim().split(['-', '/', '.']).collect();

    let (year_text, month_text) = match parts[..] {
        [year, month] | [year, month, _] if year.len() == 4 => (year, month),
        [month, year] if year.len() == 4 => (year, month),
        _ => return Err(invalid()),
    };

    let year: i32 = year_text.parse().map_err(|_| invalid())?;
    let month_number: u8 = month_text.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month_number).map_err(|_| invalid())?;

    Date::from_calendar_date(year, month, 1).map_err(|_| invalid())
}

#[cfg(test)]
mod calendar_tests {
    use time::macros::date;

    use crate::{Error, models::BillingDay};

    use super::{
        billing_month_for, current_billing_month, first_of_month, next_month, parse_month,
        prev_month,
    };

    #[test]
    fn first_of_month_truncates_day() {
        assert_eq!(first_of_month(date!(2024 - 03 - 19)), date!(2024 - 03 - 01));
        assert_eq!(first_of_month(date!(2024 - 03 - 01)), date!(2024 - 03 - 01));
    }

    #[test]
    fn next_month_steps_within_year() {
        assert_eq!(next_month(date!(2024 - 03 - 10)), date!(2024 - 04 - 01));
    }

    #[test]
    fn next_month_rolls_over_year_boundary() {
        assert_eq!(next_month(date!(2023 - 12 - 31)), date!(2024 - 01 - 01));
    }

    #[test]
    fn prev_month_steps_within_year() {
        assert_eq!(prev_month(date!(2024 - 04 - 01)), date!(2024 - 03 - 01));
    }

    #[test]
    fn prev_month_rolls_over_year_boundary() {
        assert_eq!(prev_month(date!(2024 - 01 - 01)), date!(2023 - 12 - 01));
    }

    #[test]
    fn next_and_prev_month_round_trip() {
        let months = [
            date!(2023 - 12 - 01),
            date!(2024 - 01 - 01),
            date!(2024 - 02 - 01),
            date!(2024 - 06 - 01),
            date!(2024 - 11 - 01),
        ];

        for month in months {
            assert_eq!(next_month(prev_month(month)), month);
            assert_eq!(prev_month(next_month(month)), month);
        }
    }

    #[test]
    fn billing_month_on_cutoff_day_stays_in_month() {
        let cutoff = BillingDay::new(10).unwrap();

        assert_eq!(
            billing_month_for(date!(2024 - 03 - 10), cutoff),
            date!(2024 - 03 - 01)
        );
    }

    #[test]
    fn billing_month_after_cutoff_rolls_forward() {
        let cutoff = BillingDay::new(10).unwrap();

        assert_eq!(
            billing_month_for(date!(2024 - 03 - 11), cutoff),
            date!(2024 - 04 - 01)
        );
    }

    #[test]
    fn billing_month_rolls_into_next_year_after_december_cutoff() {
        let cutoff = BillingDay::new(15).unwrap();

        assert_eq!(
            billing_month_for(date!(2023 - 12 - 20), cutoff),
            date!(2024 - 01 - 01)
        );
    }

    #[test]
    fn billing_month_matches_cutoff_rule_for_every_cutoff() {
        // The cutoff rule restated: day <= cutoff keeps the month, anything
        // later belongs to the next month.
        let received = date!(2024 - 03 - 14);

        for day in 1..=28 {
            let cutoff = BillingDay::new(day).unwrap();
            let expected = if received.day() <= day {
                first_of_month(received)
            } else {
                next_month(first_of_month(received))
            };

            assert_eq!(billing_month_for(received, cutoff), expected);
        }
    }

    #[test]
    fn current_billing_month_uses_the_same_rule() {
        let cutoff = BillingDay::new(10).unwrap();
        let today = date!(2024 - 05 - 23);

        assert_eq!(
            current_billing_month(today, cutoff),
            billing_month_for(today, cutoff)
        );
    }

    #[test]
    fn parse_month_accepts_year_first_forms() {
        for text in ["2024-06", "2024/06", "2024.6", "2024-06-15"] {
            assert_eq!(parse_month(text), Ok(date!(2024 - 06 - 01)), "{text}");
        }
    }

    #[test]
    fn parse_month_accepts_month_first_forms() {
        for text in ["06-2024", "6/2024", "06.2024"] {
            assert_eq!(parse_month(text), Ok(date!(2024 - 06 - 01)), "{text}");
        }
    }

    #[test]
    fn parse_month_rejects_malformed_input() {
        for text in ["", "2024", "June 2024", "2024-13", "06-24", "2024-00"] {
            assert_eq!(
                parse_month(text),
                Err(Error::InvalidMonthFormat(text.to_string())),
                "{text}"
            );
        }
    }
}
