//! The expected-bill completeness report.
//!
//! Answers "did we ever receive April's electricity bill": one row per
//! (active utility type, calendar month of the year), joined on the
//! consumption month. The billing month plays no part here; a bill received
//! late still counts for the month it was consumed in.

use time::{Date, Month};

use crate::{
    Error,
    models::TypeCode,
    stores::{BillStore, UtilityTypeStore},
};

/// One row of the expected-bill report.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedRow {
    /// The code of the utility type the row is for.
    pub utility_type: TypeCode,
    /// The display name of the utility type.
    pub utility_name: String,
    /// The consumption month the row audits (first day of the month).
    pub consumption_month: Date,
    /// Whether at least one bill exists for this (type, month) pair.
    pub received: bool,
    /// The earliest received date among those bills, if any.
    pub first_received: Option<Date>,
    /// Whether at least one of those bills has been marked paid.
    pub paid: bool,
}

/// Build the expected-bill report for `year`.
///
/// Produces exactly twelve rows per active utility type, January through
/// December, in the order the active types are listed.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn expected_rows(
    utility_types: &impl UtilityTypeStore,
    bills: &impl BillStore,
    year: i32,
) -> Result<Vec<ExpectedRow>, Error> {
    let active_types = utility_types.get_active()?;
    let mut rows = Vec::with_capacity(active_types.len() * 12);

    for utility_type in active_types {
        for month_number in 1..=12u8 {
            let month = Month::try_from(month_number).expect("month numbers 1-12 are valid");
            let consumption_month = Date::from_calendar_date(year, month, 1)
                .expect("day 1 exists in every month");

            let stats = bills.consumption_stats(&utility_type.code, consumption_month)?;

            rows.push(ExpectedRow {
                utility_type: utility_type.code.clone(),
                utility_name: utility_type.name.clone(),
                consumption_month,
                received: stats.count > 0,
                first_received: stats.first_received,
                paid: stats.paid_count > 0,
            });
        }
    }

    Ok(rows)
}
