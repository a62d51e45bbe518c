//! This module defines the domain data types.

pub use amount::Amount;
pub use bill::{Bill, BillDraft};
pub use month_status::MonthStatus;
pub use settings::{BillingDay, Settings};
pub use unit::{Unit, UnitName};
pub use utility_type::{TypeCode, UtilityType};

mod amount;
mod bill;
mod month_status;
mod settings;
mod unit;
mod utility_type;

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseID = i64;
