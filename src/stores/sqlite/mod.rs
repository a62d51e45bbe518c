//! Contains convenience type alias and function for a [Ledger] that uses the
//! SQLite backend.

pub mod bill;
pub mod month_status;
pub mod settings;
pub mod unit;
pub mod utility_type;

pub use bill::SQLiteBillStore;
pub use month_status::SQLiteMonthStatusStore;
pub use settings::SQLiteSettingsStore;
pub use unit::SQLiteUnitStore;
pub use utility_type::SQLiteUtilityTypeStore;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, ledger::Ledger};

/// An alias for a [Ledger] that uses SQLite for the backend.
pub type SqliteLedger = Ledger<
    SQLiteBillStore,
    SQLiteUtilityTypeStore,
    SQLiteUnitStore,
    SQLiteMonthStatusStore,
    SQLiteSettingsStore,
>;

/// Creates a [Ledger] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the domain
/// models and seeding the default settings, utility types and unit.
pub fn create_ledger(db_connection: Connection) -> Result<SqliteLedger, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(Ledger::new(
        SQLiteBillStore::new(connection.clone()),
        SQLiteUtilityTypeStore::new(connection.clone()),
        SQLiteUnitStore::new(connection.clone()),
        SQLiteMonthStatusStore::new(connection.clone()),
        SQLiteSettingsStore::new(connection),
    ))
}
