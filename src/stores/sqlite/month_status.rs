//! Implements a SQLite backed month status store.
//!
//! The close and reopen transitions write the status row and the batch bill
//! update inside one transaction, so a month is never left half settled.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::MonthStatus,
    stores::MonthStatusStore,
};

/// Stores billing month statuses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteMonthStatusStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteMonthStatusStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl MonthStatusStore for SQLiteMonthStatusStore {
    /// Retrieve the status row for `month`, if one has been created.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get(&self, month: Date) -> Result<Option<MonthStatus>, Error> {
        let status = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT month, is_closed, closed_at FROM month_status WHERE month = :month")?
            .query_row(&[(":month", &month)], Self::map_row)
            .optional()?;

        Ok(status)
    }

    /// Retrieve every status row, newest month first.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<MonthStatus>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT month, is_closed, closed_at FROM month_status ORDER BY month DESC")?
            .query_map([], Self::map_row)?
            .map(|maybe_status| maybe_status.map_err(Error::SqlError))
            .collect()
    }

    /// Close `month` and settle all of its bills on `paid_on`.
    ///
    /// Creates the status row if the month has never been referenced before.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn close(&mut self, month: Date, paid_on: Date) -> Result<MonthStatus, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;
        let closed_at = OffsetDateTime::now_utc();

        transaction.execute(
            "INSERT INTO month_status (month, is_closed, closed_at) VALUES (?1, 1, ?2)
             ON CONFLICT(month) DO UPDATE SET is_closed = 1, closed_at = excluded.closed_at",
            (month, closed_at),
        )?;

        let settled = transaction.execute(
            "UPDATE bill SET is_paid = 1, paid_date = ?2 WHERE billing_month = ?1",
            (month, paid_on),
        )?;

        transaction.commit()?;

        tracing::info!("closed billing month {month}, settled {settled} bill(s)");

        Ok(MonthStatus {
            month,
            is_closed: true,
            closed_at: Some(closed_at),
        })
    }

    /// Reopen `month` and mark all of its bills unpaid again.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn reopen(&mut self, month: Date) -> Result<MonthStatus, Error> {
        let connection = self.connection.lock().unwrap();
        let transaction = connection.unchecked_transaction()?;

        transaction.execute(
            "INSERT INTO month_status (month, is_closed, closed_at) VALUES (?1, 0, NULL)
             ON CONFLICT(month) DO UPDATE SET is_closed = 0, closed_at = NULL",
            (month,),
        )?;

        let unsettled = transaction.execute(
            "UPDATE bill SET is_paid = 0, paid_date = NULL WHERE billing_month = ?1",
            (month,),
        )?;

        transaction.commit()?;

        tracing::info!("reopened billing month {month}, unsettled {unsettled} bill(s)");

        Ok(MonthStatus::open(month))
    }
}

impl CreateTable for SQLiteMonthStatusStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS month_status (
                month TEXT PRIMARY KEY,
                is_closed INTEGER NOT NULL DEFAULT 0,
                closed_at TEXT
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteMonthStatusStore {
    type ReturnType = MonthStatus;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(MonthStatus {
            month: row.get(offset)?,
            is_closed: row.get(offset + 1)?,
            closed_at: row.get(offset + 2)?,
        })
    }
}
