//! Defines the bill store trait.

use time::Date;

use crate::{
    Error,
    models::{Amount, Bill, BillDraft, DatabaseID, TypeCode},
};

/// Aggregate facts about the bills for one (utility type, consumption month)
/// pair, used by the expected-bill report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConsumptionStats {
    /// How many bills exist for the pair.
    pub count: usize,
    /// The earliest received date among those bills, if any exist.
    pub first_received: Option<Date>,
    /// How many of those bills are marked paid.
    pub paid_count: usize,
}

/// Handles the creation and retrieval of bills.
///
/// Implementations persist exactly what they are given: the closed-month
/// invariant and the billing month derivation live in the
/// [ledger](crate::ledger), not here.
pub trait BillStore {
    /// Create a new bill in the store with the given derived billing month.
    ///
    /// The bill starts out unpaid.
    fn create(&mut self, draft: BillDraft, billing_month: Date) -> Result<Bill, Error>;

    /// Retrieve a bill from the store.
    fn get(&self, id: DatabaseID) -> Result<Bill, Error>;

    /// Retrieve all bills, most recently received first.
    fn get_all(&self) -> Result<Vec<Bill>, Error>;

    /// Retrieve the bills charged in `billing_month`, ordered by utility type.
    fn get_by_billing_month(&self, billing_month: Date) -> Result<Vec<Bill>, Error>;

    /// Replace the editable fields of the bill `id` and reset its paid state.
    ///
    /// Saving re-derives the billing month, so it is passed alongside the
    /// draft.
    fn update(&mut self, id: DatabaseID, draft: BillDraft, billing_month: Date)
    -> Result<Bill, Error>;

    /// Delete the bill `id` from the store.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;

    /// The distinct billing months that have at least one bill, newest first.
    fn billing_months(&self) -> Result<Vec<Date>, Error>;

    /// The number of bills charged in `billing_month`.
    fn count_for_billing_month(&self, billing_month: Date) -> Result<usize, Error>;

    /// The sum of the amounts charged in `billing_month`.
    fn total_for_billing_month(&self, billing_month: Date) -> Result<Amount, Error>;

    /// Aggregate facts for one (utility type, consumption month) pair.
    fn consumption_stats(
        &self,
        utility_type: &TypeCode,
        consumption_month: Date,
    ) -> Result<ConsumptionStats, Error>;
}
