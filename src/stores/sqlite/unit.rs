//! Implements a SQLite backed unit store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, Unit, UnitName},
    stores::UnitStore,
};

/// Stores rental units in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUnitStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUnitStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UnitStore for SQLiteUnitStore {
    /// Create a unit in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUnitName] if a unit with `name` already exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, name: UnitName) -> Result<Unit, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO unit (name, is_active) VALUES (?1, 1)",
                (name.as_ref(),),
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateUnitName(name.to_string())
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Ok(Unit {
            id,
            name,
            is_active: true,
        })
    }

    /// Retrieve a unit in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid unit,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Unit, Error> {
        let unit = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, is_active FROM unit WHERE id = :id")?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(unit)
    }

    /// Retrieve all units ordered by name.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Unit>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, is_active FROM unit ORDER BY name")?
            .query_map([], Self::map_row)?
            .map(|maybe_unit| maybe_unit.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the active units ordered by name.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_active(&self) -> Result<Vec<Unit>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, name, is_active FROM unit WHERE is_active = 1 ORDER BY name")?
            .query_map([], Self::map_row)?
            .map(|maybe_unit| maybe_unit.map_err(Error::SqlError))
            .collect()
    }

    /// The number of active units.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn count_active(&self) -> Result<usize, Error> {
        let count: i64 = self.connection.lock().unwrap().query_row(
            "SELECT COUNT(id) FROM unit WHERE is_active = 1",
            [],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    /// Mark the unit `id` inactive.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid unit,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn deactivate(&mut self, id: DatabaseID) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE unit SET is_active = 0 WHERE id = ?1", (id,))?;

        if affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteUnitStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS unit (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUnitStore {
    type ReturnType = Unit;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_name: String = row.get(offset + 1)?;

        Ok(Unit {
            id: row.get(offset)?,
            name: UnitName::new_unchecked(&raw_name),
            is_active: row.get(offset + 2)?,
        })
    }
}
