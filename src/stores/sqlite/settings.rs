//! Implements a SQLite backed settings store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Amount, BillingDay, Settings},
    stores::SettingsStore,
};

/// Stores the settings singleton in a SQLite database.
///
/// The row is created by [initialize](crate::db::initialize), so
/// [SettingsStore::get] always finds it.
#[derive(Debug, Clone)]
pub struct SQLiteSettingsStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSettingsStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl SettingsStore for SQLiteSettingsStore {
    /// Retrieve the settings.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get(&self) -> Result<Settings, Error> {
        let settings = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT recurring_charge, billing_day, active_year FROM settings WHERE id = 1")?
            .query_row([], Self::map_row)?;

        Ok(settings)
    }

    /// Replace the settings.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn update(&mut self, settings: &Settings) -> Result<(), Error> {
        self.connection.lock().unwrap().execute(
            "UPDATE settings SET recurring_charge = ?1, billing_day = ?2, active_year = ?3
             WHERE id = 1",
            (
                settings.recurring_charge.cents(),
                settings.billing_day.get(),
                settings.active_year,
            ),
        )?;

        Ok(())
    }
}

impl CreateTable for SQLiteSettingsStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        // CHECK (id = 1) pins the table to a single row.
        connection.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                recurring_charge INTEGER NOT NULL DEFAULT 0,
                billing_day INTEGER NOT NULL DEFAULT 10,
                active_year INTEGER NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteSettingsStore {
    type ReturnType = Settings;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Settings {
            recurring_charge: Amount::from_cents(row.get(offset)?),
            billing_day: BillingDay::new_unchecked(row.get(offset + 1)?),
            active_year: row.get(offset + 2)?,
        })
    }
}
