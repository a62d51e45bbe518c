//! Contains traits and implementations for objects that store the domain [models](crate::models).

mod bill;
mod month_status;
mod settings;
mod unit;
mod utility_type;

pub mod sqlite;

pub use bill::{BillStore, ConsumptionStats};
pub use month_status::MonthStatusStore;
pub use settings::SettingsStore;
pub use unit::UnitStore;
pub use utility_type::UtilityTypeStore;
