//! The month ledger service.
//!
//! [Ledger] ties the stores together and enforces the rules that span more
//! than one of them: the closed-month invariant on every bill mutation, the
//! billing month derivation at save time, and the last-active-unit guard. It
//! is generic over the store traits so tests can swap backends, with
//! [SqliteLedger](crate::stores::sqlite::SqliteLedger) as the concrete alias.

use std::collections::{BTreeMap, BTreeSet};

use time::{Date, OffsetDateTime};

use crate::{
    Error, calendar,
    models::{
        Amount, Bill, BillDraft, DatabaseID, MonthStatus, Settings, TypeCode, Unit, UnitName,
        UtilityType,
    },
    report::{self, ExpectedRow},
    stores::{BillStore, MonthStatusStore, SettingsStore, UnitStore, UtilityTypeStore},
};

/// One line of the billing month listing: a month that has bills, a status
/// row, or both.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    /// The billing month (first day of the month).
    pub month: Date,
    /// Whether the month is closed.
    pub is_closed: bool,
    /// How many bills are charged in the month.
    pub bill_count: usize,
    /// The sum of the bill amounts charged in the month.
    pub total: Amount,
}

/// The full charge breakdown for one billing month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyCharge {
    /// The status of the month. Months never closed report as open.
    pub status: MonthStatus,
    /// The bills charged in the month, ordered by utility type.
    pub bills: Vec<Bill>,
    /// The sum of the bill amounts.
    pub utility_total: Amount,
    /// The recurring charge from the settings.
    pub recurring_charge: Amount,
    /// Utility total plus the recurring charge.
    pub grand_total: Amount,
}

/// A snapshot of the current billing cycle for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    /// The billing month today falls in, per the cutoff rule.
    pub billing_month: Date,
    /// How many bills are charged in that month so far.
    pub bill_count: usize,
    /// The sum of those bill amounts.
    pub utility_total: Amount,
    /// Whether that month has already been closed.
    pub is_closed: bool,
    /// How many expected bills for the active year have not arrived yet.
    pub missing_count: usize,
}

/// The application service for the utility bill ledger.
#[derive(Debug, Clone)]
pub struct Ledger<B, T, U, M, S>
where
    B: BillStore,
    T: UtilityTypeStore,
    U: UnitStore,
    M: MonthStatusStore,
    S: SettingsStore,
{
    bill_store: B,
    type_store: T,
    unit_store: U,
    month_store: M,
    settings_store: S,
}

impl<B, T, U, M, S> Ledger<B, T, U, M, S>
where
    B: BillStore,
    T: UtilityTypeStore,
    U: UnitStore,
    M: MonthStatusStore,
    S: SettingsStore,
{
    /// Create a ledger over the given stores.
    pub fn new(
        bill_store: B,
        type_store: T,
        unit_store: U,
        month_store: M,
        settings_store: S,
    ) -> Self {
        Self {
            bill_store,
            type_store,
            unit_store,
            month_store,
            settings_store,
        }
    }

    fn month_is_closed(&self, month: Date) -> Result<bool, Error> {
        Ok(self
            .month_store
            .get(month)?
            .is_some_and(|status| status.is_closed))
    }

    /// Retrieve the bill `id`.
    ///
    /// # Errors
    /// This function will return an [Error::NotFound] if `id` does not refer
    /// to a valid bill.
    pub fn bill(&self, id: DatabaseID) -> Result<Bill, Error> {
        self.bill_store.get(id)
    }

    /// Create a new bill, or replace the editable fields of the bill `id`.
    ///
    /// The billing month is derived from the received date and the cutoff in
    /// the settings, and the paid state is always reset; payment is only ever
    /// granted by closing the month.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InactiveUtilityType] if the draft's utility type is unknown
    ///   or inactive,
    /// - [Error::InactiveUnit] if the draft's unit is unknown or inactive,
    /// - [Error::MonthClosed] if the bill currently sits in a closed month,
    ///   or its derived billing month is closed,
    /// - [Error::NotFound] if `id` is given but does not refer to a valid
    ///   bill,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn save_bill(&mut self, id: Option<DatabaseID>, draft: BillDraft) -> Result<Bill, Error> {
        let utility_type = match self.type_store.get_by_code(&draft.utility_type) {
            Ok(utility_type) => utility_type,
            Err(Error::NotFound) => {
                return Err(Error::InactiveUtilityType(draft.utility_type.to_string()));
            }
            Err(error) => return Err(error),
        };

        if !utility_type.is_active {
            return Err(Error::InactiveUtilityType(draft.utility_type.to_string()));
        }

        if let Some(unit_id) = draft.unit_id {
            let unit = match self.unit_store.get(unit_id) {
                Ok(unit) => unit,
                Err(Error::NotFound) => return Err(Error::InactiveUnit(unit_id)),
                Err(error) => return Err(error),
            };

            if !unit.is_active {
                return Err(Error::InactiveUnit(unit_id));
            }
        }

        let settings = self.settings_store.get()?;
        let billing_month = calendar::billing_month_for(draft.received_date, settings.billing_day);

        if self.month_is_closed(billing_month)? {
            return Err(Error::MonthClosed(billing_month));
        }

        match id {
            Some(id) => {
                let existing = self.bill_store.get(id)?;

                if self.month_is_closed(existing.billing_month)? {
                    return Err(Error::MonthClosed(existing.billing_month));
                }

                self.bill_store.update(id, draft, billing_month)
            }
            None => self.bill_store.create(draft, billing_month),
        }
    }

    /// Delete the bill `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::MonthClosed] if the bill sits in a closed month,
    /// - [Error::NotFound] if `id` does not refer to a valid bill,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn delete_bill(&mut self, id: DatabaseID) -> Result<(), Error> {
        let bill = self.bill_store.get(id)?;

        if self.month_is_closed(bill.billing_month)? {
            return Err(Error::MonthClosed(bill.billing_month));
        }

        self.bill_store.delete(id)
    }

    /// Close the billing month `month`, settling all of its bills today.
    ///
    /// Closing an already closed month is a no-op apart from refreshing the
    /// closing timestamp.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFirstOfMonth] if `month` is not the first day of a month,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn close_month(&mut self, month: Date) -> Result<MonthStatus, Error> {
        if month.day() != 1 {
            return Err(Error::NotFirstOfMonth(month));
        }

        let today = OffsetDateTime::now_utc().date();
        self.month_store.close(month, today)
    }

    /// Reopen the billing month `month`, marking all of its bills unpaid.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFirstOfMonth] if `month` is not the first day of a month,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn reopen_month(&mut self, month: Date) -> Result<MonthStatus, Error> {
        if month.day() != 1 {
            return Err(Error::NotFirstOfMonth(month));
        }

        self.month_store.reopen(month)
    }

    /// List every billing month that has bills or a status row, newest first.
    ///
    /// Months that were never explicitly closed or reopened report as open.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn months(&self) -> Result<Vec<MonthSummary>, Error> {
        let mut closed = BTreeMap::new();
        for status in self.month_store.get_all()? {
            closed.insert(status.month, status.is_closed);
        }

        let mut months: BTreeSet<Date> = self.bill_store.billing_months()?.into_iter().collect();
        months.extend(closed.keys().copied());

        months
            .into_iter()
            .rev()
            .map(|month| {
                Ok(MonthSummary {
                    month,
                    is_closed: closed.get(&month).copied().unwrap_or(false),
                    bill_count: self.bill_store.count_for_billing_month(month)?,
                    total: self.bill_store.total_for_billing_month(month)?,
                })
            })
            .collect()
    }

    /// The full charge breakdown for the billing month `month`.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn monthly_charge(&self, month: Date) -> Result<MonthlyCharge, Error> {
        let status = self
            .month_store
            .get(month)?
            .unwrap_or_else(|| MonthStatus::open(month));
        let bills = self.bill_store.get_by_billing_month(month)?;
        let utility_total: Amount = bills.iter().map(|bill| bill.amount).sum();
        let recurring_charge = self.settings_store.get()?.recurring_charge;

        Ok(MonthlyCharge {
            status,
            bills,
            utility_total,
            recurring_charge,
            grand_total: utility_total + recurring_charge,
        })
    }

    /// The expected-bill report for `year`: twelve rows per active utility
    /// type, keyed on the consumption month.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn expected_rows(&self, year: i32) -> Result<Vec<ExpectedRow>, Error> {
        report::expected_rows(&self.type_store, &self.bill_store, year)
    }

    /// A snapshot of the billing cycle `today` falls in.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn overview(&self, today: Date) -> Result<Overview, Error> {
        let settings = self.settings_store.get()?;
        let billing_month = calendar::current_billing_month(today, settings.billing_day);

        let missing_count = self
            .expected_rows(settings.active_year)?
            .iter()
            .filter(|row| !row.received)
            .count();

        Ok(Overview {
            billing_month,
            bill_count: self.bill_store.count_for_billing_month(billing_month)?,
            utility_total: self.bill_store.total_for_billing_month(billing_month)?,
            is_closed: self.month_is_closed(billing_month)?,
            missing_count,
        })
    }

    /// Retrieve the settings.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn settings(&self) -> Result<Settings, Error> {
        self.settings_store.get()
    }

    /// Replace the settings.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the recurring charge is negative,
    /// - or [Error::SqlError] if there is an SQL error.
    pub fn update_settings(&mut self, settings: &Settings) -> Result<(), Error> {
        if !settings.recurring_charge.is_non_negative() {
            return Err(Error::InvalidAmount(settings.recurring_charge.to_string()));
        }

        self.settings_store.update(settings)
    }

    /// List the whole utility type catalog.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn utility_types(&self) -> Result<Vec<UtilityType>, Error> {
        self.type_store.get_all()
    }

    /// Add a utility type to the catalog.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTypeName] if `name` is empty or whitespace,
    /// - [Error::DuplicateTypeCode] if a type with `code` already exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn add_utility_type(&mut self, code: TypeCode, name: &str) -> Result<UtilityType, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyTypeName);
        }

        self.type_store.create(code, name)
    }

    /// Mark the utility type `id` inactive. Its historical bills survive.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid utility type,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn deactivate_utility_type(&mut self, id: DatabaseID) -> Result<(), Error> {
        self.type_store.deactivate(id)
    }

    /// List all units.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    pub fn units(&self) -> Result<Vec<Unit>, Error> {
        self.unit_store.get_all()
    }

    /// Add a unit.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUnitName] if a unit with `name` already exists,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn add_unit(&mut self, name: UnitName) -> Result<Unit, Error> {
        self.unit_store.create(name)
    }

    /// Mark the unit `id` inactive, keeping at least one unit active.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::LastActiveUnit] if `id` is the only active unit,
    /// - [Error::NotFound] if `id` does not refer to a valid unit,
    /// - or [Error::SqlError] if there is some other SQL error.
    pub fn deactivate_unit(&mut self, id: DatabaseID) -> Result<(), Error> {
        let unit = self.unit_store.get(id)?;

        if unit.is_active && self.unit_store.count_active()? <= 1 {
            return Err(Error::LastActiveUnit);
        }

        self.unit_store.deactivate(id)
    }
}
