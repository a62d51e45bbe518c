//! Implements a SQLite backed utility type store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, TypeCode, UtilityType},
    stores::UtilityTypeStore,
};

/// Stores the utility type catalog in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUtilityTypeStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUtilityTypeStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UtilityTypeStore for SQLiteUtilityTypeStore {
    /// Create a utility type in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateTypeCode] if a type with `code` already exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, code: TypeCode, name: &str) -> Result<UtilityType, Error> {
        let connection = self.connection.lock().unwrap();

        connection
            .execute(
                "INSERT INTO utility_type (code, name, is_active) VALUES (?1, ?2, 1)",
                (code.as_str(), name),
            )
            .map_err(|error| match error {
                // Code 2067 occurs when a UNIQUE constraint failed.
                rusqlite::Error::SqliteFailure(sql_error, Some(_))
                    if sql_error.extended_code == 2067 =>
                {
                    Error::DuplicateTypeCode(code.to_string())
                }
                error => error.into(),
            })?;

        let id = connection.last_insert_rowid();

        Ok(UtilityType {
            id,
            code,
            name: name.to_string(),
            is_active: true,
        })
    }

    /// Retrieve a utility type in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid utility type,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<UtilityType, Error> {
        let utility_type = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, code, name, is_active FROM utility_type WHERE id = :id")?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(utility_type)
    }

    /// Retrieve a utility type in the database by its `code`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `code` does not refer to a valid utility type,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get_by_code(&self, code: &TypeCode) -> Result<UtilityType, Error> {
        let utility_type = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, code, name, is_active FROM utility_type WHERE code = :code")?
            .query_row(&[(":code", &code.as_str())], Self::map_row)?;

        Ok(utility_type)
    }

    /// Retrieve all utility types ordered by name.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<UtilityType>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT id, code, name, is_active FROM utility_type ORDER BY name")?
            .query_map([], Self::map_row)?
            .map(|maybe_type| maybe_type.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the active utility types ordered by name.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_active(&self) -> Result<Vec<UtilityType>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(
                "SELECT id, code, name, is_active FROM utility_type
                 WHERE is_active = 1 ORDER BY name",
            )?
            .query_map([], Self::map_row)?
            .map(|maybe_type| maybe_type.map_err(Error::SqlError))
            .collect()
    }

    /// Mark the utility type `id` inactive.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid utility type,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn deactivate(&mut self, id: DatabaseID) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE utility_type SET is_active = 0 WHERE id = ?1", (id,))?;

        if affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}

impl CreateTable for SQLiteUtilityTypeStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS utility_type (
                id INTEGER PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUtilityTypeStore {
    type ReturnType = UtilityType;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_code: String = row.get(offset + 1)?;

        Ok(UtilityType {
            id: row.get(offset)?,
            code: TypeCode::new_unchecked(&raw_code),
            name: row.get(offset + 2)?,
            is_active: row.get(offset + 3)?,
        })
    }
}

#[cfg(test)]
mod utility_type_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, db::initialize, models::TypeCode, stores::UtilityTypeStore};

    use super::SQLiteUtilityTypeStore;

    fn get_test_store() -> SQLiteUtilityTypeStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteUtilityTypeStore::new(Arc::new(Mutex::new(connection)))
    }

    #[test]
    fn seeded_types_are_present_and_active() {
        let store = get_test_store();

        let codes: Vec<_> = store
            .get_active()
            .unwrap()
            .into_iter()
            .map(|utility_type| utility_type.code.to_string())
            .collect();

        for code in ["electricity", "water", "gas", "waste"] {
            assert!(codes.contains(&code.to_string()), "missing {code}");
        }
    }

    #[test]
    fn create_type_succeeds() {
        let mut store = get_test_store();
        let code = TypeCode::new("internet").unwrap();

        let utility_type = store.create(code.clone(), "Internet").unwrap();

        assert!(utility_type.id > 0);
        assert_eq!(utility_type.code, code);
        assert!(utility_type.is_active);
        assert_eq!(store.get_by_code(&code), Ok(utility_type));
    }

    #[test]
    fn create_duplicate_code_is_rejected() {
        let mut store = get_test_store();

        let result = store.create(TypeCode::new_unchecked("water"), "Water again");

        assert_eq!(result, Err(Error::DuplicateTypeCode("water".to_string())));
    }

    #[test]
    fn get_by_code_with_unknown_code_returns_not_found() {
        let store = get_test_store();

        let result = store.get_by_code(&TypeCode::new_unchecked("heating"));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn deactivate_excludes_type_from_active_listing() {
        let mut store = get_test_store();
        let water = store.get_by_code(&TypeCode::new_unchecked("water")).unwrap();

        store.deactivate(water.id).unwrap();

        let active = store.get_active().unwrap();
        assert!(active.iter().all(|utility_type| utility_type.id != water.id));
        // The type itself survives for historical bills.
        assert!(!store.get(water.id).unwrap().is_active);
    }
}
