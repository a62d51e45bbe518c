//! Implements a SQLite backed bill store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Amount, Bill, BillDraft, DatabaseID, TypeCode},
    stores::{BillStore, ConsumptionStats},
};

const BILL_COLUMNS: &str = "id, utility_type, unit_id, consumption_month, received_date, \
     billing_month, amount, is_paid, paid_date, note, created_at";

/// Stores bills in a SQLite database.
///
/// Note that because a bill references the [UtilityType](crate::models::UtilityType)
/// and [Unit](crate::models::Unit) models, these models must be set up in the
/// database.
#[derive(Debug, Clone)]
pub struct SQLiteBillStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBillStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl BillStore for SQLiteBillStore {
    /// Create a bill in the database. The bill starts out unpaid.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(&mut self, draft: BillDraft, billing_month: Date) -> Result<Bill, Error> {
        let connection = self.connection.lock().unwrap();
        let created_at = OffsetDateTime::now_utc();

        let bill = connection
            .prepare(&format!(
                "INSERT INTO bill (utility_type, unit_id, consumption_month, received_date, \
                     billing_month, amount, is_paid, paid_date, note, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, NULL, ?7, ?8)
                 RETURNING {BILL_COLUMNS}"
            ))?
            .query_row(
                (
                    draft.utility_type.as_str(),
                    draft.unit_id,
                    draft.consumption_month,
                    draft.received_date,
                    billing_month,
                    draft.amount.cents(),
                    &draft.note,
                    created_at,
                ),
                Self::map_row,
            )?;

        Ok(bill)
    }

    /// Retrieve a bill in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid bill,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: DatabaseID) -> Result<Bill, Error> {
        let bill = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!("SELECT {BILL_COLUMNS} FROM bill WHERE id = :id"))?
            .query_row(&[(":id", &id)], Self::map_row)?;

        Ok(bill)
    }

    /// Retrieve all bills, most recently received first.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Bill>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {BILL_COLUMNS} FROM bill ORDER BY received_date DESC, id DESC"
            ))?
            .query_map([], Self::map_row)?
            .map(|maybe_bill| maybe_bill.map_err(Error::SqlError))
            .collect()
    }

    /// Retrieve the bills charged in `billing_month`, ordered by utility type.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn get_by_billing_month(&self, billing_month: Date) -> Result<Vec<Bill>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "SELECT {BILL_COLUMNS} FROM bill
                 WHERE billing_month = :month
                 ORDER BY utility_type, id"
            ))?
            .query_map(&[(":month", &billing_month)], Self::map_row)?
            .map(|maybe_bill| maybe_bill.map_err(Error::SqlError))
            .collect()
    }

    /// Replace the editable fields of the bill `id` and reset its paid state.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid bill,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &mut self,
        id: DatabaseID,
        draft: BillDraft,
        billing_month: Date,
    ) -> Result<Bill, Error> {
        let bill = self
            .connection
            .lock()
            .unwrap()
            .prepare(&format!(
                "UPDATE bill
                 SET utility_type = ?2, unit_id = ?3, consumption_month = ?4, \
                     received_date = ?5, billing_month = ?6, amount = ?7, \
                     is_paid = 0, paid_date = NULL, note = ?8
                 WHERE id = ?1
                 RETURNING {BILL_COLUMNS}"
            ))?
            .query_row(
                (
                    id,
                    draft.utility_type.as_str(),
                    draft.unit_id,
                    draft.consumption_month,
                    draft.received_date,
                    billing_month,
                    draft.amount.cents(),
                    &draft.note,
                ),
                Self::map_row,
            )?;

        Ok(bill)
    }

    /// Delete the bill `id` from the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid bill,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error> {
        let affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM bill WHERE id = ?1", (id,))?;

        if affected == 0 {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }

    /// The distinct billing months that have at least one bill, newest first.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn billing_months(&self) -> Result<Vec<Date>, Error> {
        self.connection
            .lock()
            .unwrap()
            .prepare("SELECT DISTINCT billing_month FROM bill ORDER BY billing_month DESC")?
            .query_map([], |row| row.get(0))?
            .map(|maybe_month| maybe_month.map_err(Error::SqlError))
            .collect()
    }

    /// The number of bills charged in `billing_month`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn count_for_billing_month(&self, billing_month: Date) -> Result<usize, Error> {
        let count: i64 = self.connection.lock().unwrap().query_row(
            "SELECT COUNT(id) FROM bill WHERE billing_month = :month",
            &[(":month", &billing_month)],
            |row| row.get(0),
        )?;

        Ok(count as usize)
    }

    /// The sum of the amounts charged in `billing_month`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn total_for_billing_month(&self, billing_month: Date) -> Result<Amount, Error> {
        let cents: i64 = self.connection.lock().unwrap().query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM bill WHERE billing_month = :month",
            &[(":month", &billing_month)],
            |row| row.get(0),
        )?;

        Ok(Amount::from_cents(cents))
    }

    /// Aggregate facts for one (utility type, consumption month) pair.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn consumption_stats(
        &self,
        utility_type: &TypeCode,
        consumption_month: Date,
    ) -> Result<ConsumptionStats, Error> {
        let stats = self.connection.lock().unwrap().query_row(
            "SELECT COUNT(id), MIN(received_date), COALESCE(SUM(is_paid), 0) FROM bill
             WHERE utility_type = :code AND consumption_month = :month",
            rusqlite::named_params! {
                ":code": utility_type.as_str(),
                ":month": consumption_month,
            },
            |row| {
                Ok(ConsumptionStats {
                    count: row.get::<_, i64>(0)? as usize,
                    first_received: row.get(1)?,
                    paid_count: row.get::<_, i64>(2)? as usize,
                })
            },
        )?;

        Ok(stats)
    }
}

impl CreateTable for SQLiteBillStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS bill (
                id INTEGER PRIMARY KEY,
                utility_type TEXT NOT NULL,
                unit_id INTEGER,
                consumption_month TEXT NOT NULL,
                received_date TEXT NOT NULL,
                billing_month TEXT NOT NULL,
                amount INTEGER NOT NULL,
                is_paid INTEGER NOT NULL DEFAULT 0,
                paid_date TEXT,
                note TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY(utility_type) REFERENCES utility_type(code) ON UPDATE CASCADE,
                FOREIGN KEY(unit_id) REFERENCES unit(id) ON UPDATE CASCADE ON DELETE SET NULL
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_bill_billing_month ON bill (billing_month)",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_bill_consumption
             ON bill (utility_type, consumption_month)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteBillStore {
    type ReturnType = Bill;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_code: String = row.get(offset + 1)?;

        Ok(Bill {
            id: row.get(offset)?,
            utility_type: TypeCode::new_unchecked(&raw_code),
            unit_id: row.get(offset + 2)?,
            consumption_month: row.get(offset + 3)?,
            received_date: row.get(offset + 4)?,
            billing_month: row.get(offset + 5)?,
            amount: Amount::from_cents(row.get(offset + 6)?),
            is_paid: row.get(offset + 7)?,
            paid_date: row.get(offset + 8)?,
            note: row.get(offset + 9)?,
            created_at: row.get(offset + 10)?,
        })
    }
}

#[cfg(test)]
mod bill_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{Amount, BillDraft, TypeCode},
        stores::{BillStore, ConsumptionStats},
    };

    use super::SQLiteBillStore;

    fn get_test_store() -> SQLiteBillStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteBillStore::new(Arc::new(Mutex::new(connection)))
    }

    fn electricity_draft() -> BillDraft {
        BillDraft::new(
            TypeCode::new_unchecked("electricity"),
            date!(2024 - 05 - 01),
            date!(2024 - 06 - 05),
            Amount::from_cents(4730),
        )
        .unwrap()
    }

    #[test]
    fn create_bill_succeeds() {
        let mut store = get_test_store();

        let bill = store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();

        assert!(bill.id > 0);
        assert_eq!(bill.billing_month, date!(2024 - 06 - 01));
        assert_eq!(bill.amount, Amount::from_cents(4730));
        assert!(!bill.is_paid);
        assert_eq!(bill.paid_date, None);
    }

    #[test]
    fn get_bill_succeeds() {
        let mut store = get_test_store();
        let inserted_bill = store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();

        let selected_bill = store.get(inserted_bill.id);

        assert_eq!(Ok(inserted_bill), selected_bill);
    }

    #[test]
    fn get_bill_with_invalid_id_returns_not_found() {
        let store = get_test_store();

        assert_eq!(store.get(123), Err(Error::NotFound));
    }

    #[test]
    fn update_bill_replaces_fields_and_resets_paid_state() {
        let mut store = get_test_store();
        let bill = store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();

        let new_draft = BillDraft::new(
            TypeCode::new_unchecked("water"),
            date!(2024 - 06 - 01),
            date!(2024 - 06 - 20),
            Amount::from_cents(1250),
        )
        .unwrap()
        .with_note("estimate");

        let updated = store
            .update(bill.id, new_draft, date!(2024 - 07 - 01))
            .unwrap();

        assert_eq!(updated.id, bill.id);
        assert_eq!(updated.utility_type.as_str(), "water");
        assert_eq!(updated.billing_month, date!(2024 - 07 - 01));
        assert_eq!(updated.amount, Amount::from_cents(1250));
        assert_eq!(updated.note, Some("estimate".to_string()));
        assert!(!updated.is_paid);
    }

    #[test]
    fn update_missing_bill_returns_not_found() {
        let mut store = get_test_store();

        let result = store.update(99, electricity_draft(), date!(2024 - 06 - 01));

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_bill_succeeds() {
        let mut store = get_test_store();
        let bill = store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();

        store.delete(bill.id).unwrap();

        assert_eq!(store.get(bill.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_bill_returns_not_found() {
        let mut store = get_test_store();

        assert_eq!(store.delete(99), Err(Error::NotFound));
    }

    #[test]
    fn get_all_orders_by_received_date_descending() {
        let mut store = get_test_store();
        let later = BillDraft::new(
            TypeCode::new_unchecked("water"),
            date!(2024 - 05 - 01),
            date!(2024 - 06 - 20),
            Amount::from_cents(1270),
        )
        .unwrap();
        let earlier_id = store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap()
            .id;
        let later_id = store.create(later, date!(2024 - 07 - 01)).unwrap().id;

        let bills = store.get_all().unwrap();

        let ids: Vec<_> = bills.into_iter().map(|bill| bill.id).collect();
        assert_eq!(ids, vec![later_id, earlier_id]);
    }

    #[test]
    fn billing_months_are_distinct_and_newest_first() {
        let mut store = get_test_store();
        store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();
        store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();
        store
            .create(electricity_draft(), date!(2024 - 04 - 01))
            .unwrap();

        let months = store.billing_months().unwrap();

        assert_eq!(months, vec![date!(2024 - 06 - 01), date!(2024 - 04 - 01)]);
    }

    #[test]
    fn totals_and_counts_per_billing_month() {
        let mut store = get_test_store();
        store
            .create(electricity_draft(), date!(2024 - 06 - 01))
            .unwrap();
        let water = BillDraft::new(
            TypeCode::new_unchecked("water"),
            date!(2024 - 05 - 01),
            date!(2024 - 06 - 08),
            Amount::from_cents(1270),
        )
        .unwrap();
        store.create(water, date!(2024 - 06 - 01)).unwrap();

        assert_eq!(store.count_for_billing_month(date!(2024 - 06 - 01)), Ok(2));
        assert_eq!(
            store.total_for_billing_month(date!(2024 - 06 - 01)),
            Ok(Amount::from_cents(6000))
        );
        assert_eq!(store.count_for_billing_month(date!(2024 - 07 - 01)), Ok(0));
        assert_eq!(
            store.total_for_billing_month(date!(2024 - 07 - 01)),
            Ok(Amount::ZERO)
        );
    }

    #[test]
    fn consumption_stats_counts_by_consumption_month() {
        let mut store = get_test_store();
        let first = BillDraft::new(
            TypeCode::new_unchecked("electricity"),
            date!(2024 - 05 - 01),
            date!(2024 - 06 - 12),
            Amount::from_cents(100),
        )
        .unwrap();
        let second = BillDraft::new(
            TypeCode::new_unchecked("electricity"),
            date!(2024 - 05 - 01),
            date!(2024 - 06 - 05),
            Amount::from_cents(200),
        )
        .unwrap();
        store.create(first, date!(2024 - 07 - 01)).unwrap();
        store.create(second, date!(2024 - 06 - 01)).unwrap();

        let stats = store
            .consumption_stats(&TypeCode::new_unchecked("electricity"), date!(2024 - 05 - 01))
            .unwrap();

        assert_eq!(
            stats,
            ConsumptionStats {
                count: 2,
                first_received: Some(date!(2024 - 06 - 05)),
                paid_count: 0,
            }
        );
    }

    #[test]
    fn consumption_stats_for_missing_pair_is_empty() {
        let store = get_test_store();

        let stats = store
            .consumption_stats(&TypeCode::new_unchecked("gas"), date!(2024 - 01 - 01))
            .unwrap();

        assert_eq!(stats, ConsumptionStats::default());
    }
}
