//! Defines the open/closed status record of a billing month.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// The status of a billing month, keyed by its first day.
///
/// Status rows are created lazily the first time a month is referenced, so a
/// month without a row is open. Closing a month settles all of its bills in
/// one step; bills in a closed month cannot be created, edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthStatus {
    /// The billing month, always the first day of a month.
    pub month: Date,
    /// Whether the month has been closed.
    pub is_closed: bool,
    /// When the month was closed. `None` while the month is open.
    pub closed_at: Option<OffsetDateTime>,
}

impl MonthStatus {
    /// The status an untouched month has before any row exists for it.
    pub fn open(month: Date) -> Self {
        Self {
            month,
            is_closed: false,
            closed_at: None,
        }
    }
}
