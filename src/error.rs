//! Defines the crate level error type shared by the stores and the ledger.

use time::Date;

use crate::models::Amount;

/// The errors that may occur while recording bills or managing billing months.
///
/// Every variant describes a local, non-retryable condition that is reported
/// synchronously to the caller. None of them are fatal to the process.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month string could not be parsed as a calendar month.
    ///
    /// Callers should pass in the text that failed to parse.
    #[error("could not parse \"{0}\" as a calendar month")]
    InvalidMonthFormat(String),

    /// A consumption month was given that is not the first day of a month.
    ///
    /// Months are always keyed by their first day so that two bills for the
    /// same month compare equal.
    #[error("{0} is not the first day of a month")]
    NotFirstOfMonth(Date),

    /// A received date in the future was used to create or edit a bill.
    ///
    /// Bills record paperwork that has already arrived, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An amount string could not be parsed as a two-decimal money value.
    #[error("could not parse \"{0}\" as a money amount")]
    InvalidAmount(String),

    /// A zero or negative amount was used to create or edit a bill.
    #[error("bill amounts must be positive, got {0}")]
    NonPositiveAmount(Amount),

    /// A billing day cutoff outside 1-28 was used to update the settings.
    ///
    /// Days 29-31 do not exist in every month, so the cutoff is restricted to
    /// the range that is valid year round.
    #[error("the billing day cutoff must be between 1 and 28, got {0}")]
    InvalidBillingDay(u8),

    /// An empty string was used to create a utility type code.
    #[error("utility type codes cannot be empty")]
    EmptyTypeCode,

    /// An empty string was used to create a utility type display name.
    #[error("utility type names cannot be empty")]
    EmptyTypeName,

    /// An empty string was used to create a unit name.
    #[error("unit names cannot be empty")]
    EmptyUnitName,

    /// The specified utility type code already exists in the database.
    #[error("the utility type code \"{0}\" already exists in the database")]
    DuplicateTypeCode(String),

    /// The specified unit name already exists in the database.
    #[error("the unit \"{0}\" already exists in the database")]
    DuplicateUnitName(String),

    /// The utility type used to create a bill was missing or inactive.
    ///
    /// Inactive types remain attached to historical bills but cannot be used
    /// for new ones.
    #[error("\"{0}\" does not refer to an active utility type")]
    InactiveUtilityType(String),

    /// The unit used to create a bill was missing or inactive.
    #[error("unit {0} does not refer to an active unit")]
    InactiveUnit(i64),

    /// Tried to deactivate the only remaining active unit.
    #[error("at least one unit must remain active")]
    LastActiveUnit,

    /// Tried to create, edit or delete a bill in a closed billing month.
    ///
    /// The month must be reopened before any of its bills can change.
    #[error("the billing month {0} is closed")]
    MonthClosed(Date),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
