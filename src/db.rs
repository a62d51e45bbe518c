/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction};
use time::OffsetDateTime;

use crate::{
    Error,
    stores::sqlite::{
        SQLiteBillStore, SQLiteMonthStatusStore, SQLiteSettingsStore, SQLiteUnitStore,
        SQLiteUtilityTypeStore,
    },
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create the table(s) for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type each row maps to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from column `offset`.
    ///
    /// This is useful in cases where tables have been joined and you want to
    /// construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the application tables and seed the defaults.
///
/// Runs inside a single exclusive transaction. Seeding is idempotent: the
/// settings singleton, the four stock utility types and the first unit are
/// only inserted when missing, so calling this on an existing database is
/// safe.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    SQLiteUtilityTypeStore::create_table(&transaction)?;
    SQLiteUnitStore::create_table(&transaction)?;
    SQLiteBillStore::create_table(&transaction)?;
    SQLiteMonthStatusStore::create_table(&transaction)?;
    SQLiteSettingsStore::create_table(&transaction)?;

    transaction.execute(
        "INSERT OR IGNORE INTO settings (id, recurring_charge, billing_day, active_year)
         VALUES (1, 0, 10, ?1)",
        (OffsetDateTime::now_utc().year(),),
    )?;

    for (code, name) in [
        ("electricity", "Electricity"),
        ("water", "Water"),
        ("gas", "Gas"),
        ("waste", "Waste collection"),
    ] {
        transaction.execute(
            "INSERT OR IGNORE INTO utility_type (code, name, is_active) VALUES (?1, ?2, 1)",
            (code, name),
        )?;
    }

    // At least one unit must be active at all times, so the first ever
    // initialize creates one.
    transaction.execute(
        "INSERT INTO unit (name, is_active)
         SELECT 'Main unit', 1
         WHERE NOT EXISTS (SELECT 1 FROM unit)",
        (),
    )?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_seeds_defaults() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let type_count: i64 = connection
            .query_row("SELECT COUNT(id) FROM utility_type", [], |row| row.get(0))
            .unwrap();
        let unit_count: i64 = connection
            .query_row("SELECT COUNT(id) FROM unit", [], |row| row.get(0))
            .unwrap();
        let billing_day: u8 = connection
            .query_row("SELECT billing_day FROM settings WHERE id = 1", [], |row| {
                row.get(0)
            })
            .unwrap();

        assert_eq!(type_count, 4);
        assert_eq!(unit_count, 1);
        assert_eq!(billing_day, 10);
    }

    #[test]
    fn initialize_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();

        let type_count: i64 = connection
            .query_row("SELECT COUNT(id) FROM utility_type", [], |row| row.get(0))
            .unwrap();
        let unit_count: i64 = connection
            .query_row("SELECT COUNT(id) FROM unit", [], |row| row.get(0))
            .unwrap();

        assert_eq!(type_count, 4);
        assert_eq!(unit_count, 1);
    }
}
