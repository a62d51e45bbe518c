//! This file defines the type `Bill`, the core record of the ledger.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    models::{Amount, DatabaseID, TypeCode},
};

/// A utility bill for one consumption month.
///
/// The billing month is derived from the received date and the billing day
/// cutoff when the bill is saved; a bill belongs to exactly one billing month
/// at any time and moves between months only by being re-saved with a
/// different received date. Both month fields are always the first day of a
/// month.
///
/// To create or edit a bill, build a [BillDraft] and pass it to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// The ID of the bill.
    pub id: DatabaseID,
    /// The code of the utility type this bill is for.
    pub utility_type: TypeCode,
    /// The unit the bill is attached to, if any.
    pub unit_id: Option<DatabaseID>,
    /// The month the utility usage occurred in (first day of the month).
    pub consumption_month: Date,
    /// The date the paper/e-mail bill arrived.
    pub received_date: Date,
    /// The month the amount is charged in (first day of the month), derived
    /// from the received date and the billing day cutoff.
    pub billing_month: Date,
    /// The billed amount.
    pub amount: Amount,
    /// Whether the bill has been settled. Set by closing its billing month.
    pub is_paid: bool,
    /// The date the bill was settled. `None` while unpaid.
    pub paid_date: Option<Date>,
    /// Free-text note.
    pub note: Option<String>,
    /// When the bill record was first created.
    pub created_at: OffsetDateTime,
}

/// Validated input for creating or editing a [Bill].
///
/// A draft carries no billing month and no paid state: the billing month is
/// derived at save time from the current settings, and saving always resets
/// the paid flag because payment is granted by closing the month.
#[derive(Debug, Clone, PartialEq)]
pub struct BillDraft {
    /// The code of the utility type the bill is for.
    pub utility_type: TypeCode,
    /// The unit the bill is attached to, if any.
    pub unit_id: Option<DatabaseID>,
    /// The month the utility usage occurred in (first day of the month).
    pub consumption_month: Date,
    /// The date the bill arrived. Never in the future.
    pub received_date: Date,
    /// The billed amount. Always positive.
    pub amount: Amount,
    /// Free-text note.
    pub note: Option<String>,
}

impl BillDraft {
    /// Create a draft, validating the parts that do not need store access.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFirstOfMonth] if `consumption_month` is not day 1 of a
    ///   month,
    /// - [Error::FutureDate] if `received_date` is later than today,
    /// - or [Error::NonPositiveAmount] if `amount` is zero or negative.
    pub fn new(
        utility_type: TypeCode,
        consumption_month: Date,
        received_date: Date,
        amount: Amount,
    ) -> Result<Self, Error> {
        if consumption_month.day() != 1 {
            return Err(Error::NotFirstOfMonth(consumption_month));
        }

        if received_date > OffsetDateTime::now_utc().date() {
            return Err(Error::FutureDate(received_date));
        }

        if !amount.is_positive() {
            return Err(Error::NonPositiveAmount(amount));
        }

        Ok(Self {
            utility_type,
            unit_id: None,
            consumption_month,
            received_date,
            amount,
            note: None,
        })
    }

    /// Attach the bill to a unit.
    pub fn with_unit(mut self, unit_id: Option<DatabaseID>) -> Self {
        self.unit_id = unit_id;
        self
    }

    /// Set the free-text note. Empty or whitespace notes are stored as none.
    pub fn with_note(mut self, note: &str) -> Self {
        let trimmed = note.trim();
        self.note = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

#[cfg(test)]
mod bill_draft_tests {
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::{
        Error,
        models::{Amount, TypeCode},
    };

    use super::BillDraft;

    fn electricity() -> TypeCode {
        TypeCode::new_unchecked("electricity")
    }

    #[test]
    fn new_succeeds_on_valid_input() {
        let draft = BillDraft::new(
            electricity(),
            date!(2024 - 06 - 01),
            date!(2024 - 07 - 03),
            Amount::from_cents(4730),
        )
        .unwrap();

        assert_eq!(draft.consumption_month, date!(2024 - 06 - 01));
        assert_eq!(draft.unit_id, None);
        assert_eq!(draft.note, None);
    }

    #[test]
    fn new_rejects_mid_month_consumption_date() {
        let maybe_draft = BillDraft::new(
            electricity(),
            date!(2024 - 06 - 15),
            date!(2024 - 07 - 03),
            Amount::from_cents(4730),
        );

        assert_eq!(
            maybe_draft,
            Err(Error::NotFirstOfMonth(date!(2024 - 06 - 15)))
        );
    }

    #[test]
    fn new_rejects_future_received_date() {
        let tomorrow = OffsetDateTime::now_utc()
            .date()
            .checked_add(Duration::days(1))
            .unwrap();

        let maybe_draft = BillDraft::new(
            electricity(),
            date!(2024 - 06 - 01),
            tomorrow,
            Amount::from_cents(4730),
        );

        assert_eq!(maybe_draft, Err(Error::FutureDate(tomorrow)));
    }

    #[test]
    fn new_rejects_non_positive_amounts() {
        for cents in [0, -100] {
            let maybe_draft = BillDraft::new(
                electricity(),
                date!(2024 - 06 - 01),
                date!(2024 - 07 - 03),
                Amount::from_cents(cents),
            );

            assert_eq!(
                maybe_draft,
                Err(Error::NonPositiveAmount(Amount::from_cents(cents)))
            );
        }
    }

    #[test]
    fn with_note_drops_blank_notes() {
        let draft = BillDraft::new(
            electricity(),
            date!(2024 - 06 - 01),
            date!(2024 - 07 - 03),
            Amount::from_cents(100),
        )
        .unwrap();

        assert_eq!(draft.clone().with_note("   ").note, None);
        assert_eq!(
            draft.with_note(" estimate ").note,
            Some("estimate".to_string())
        );
    }
}
