//! Defines the month status store trait.

use time::Date;

use crate::{Error, models::MonthStatus};

/// Maintains the open/closed status of billing months.
///
/// The close and reopen transitions also settle or unsettle every bill in the
/// month; implementations must apply the status change and the bill updates
/// as one atomic unit so a month can never be half settled.
pub trait MonthStatusStore {
    /// Retrieve the status row for `month`, if one has been created.
    fn get(&self, month: Date) -> Result<Option<MonthStatus>, Error>;

    /// Retrieve every status row that exists.
    fn get_all(&self) -> Result<Vec<MonthStatus>, Error>;

    /// Close `month`: create or update its status row to closed with a
    /// closing timestamp, and mark every bill whose billing month equals
    /// `month` as paid on `paid_on`.
    ///
    /// Closing an already closed month is allowed and yields the same end
    /// state.
    fn close(&mut self, month: Date, paid_on: Date) -> Result<MonthStatus, Error>;

    /// Reopen `month`: set its status row back to open, clear the closing
    /// timestamp, and mark every bill in the month unpaid with no paid date.
    ///
    /// This is the full inverse of [MonthStatusStore::close].
    fn reopen(&mut self, month: Date) -> Result<MonthStatus, Error>;
}
