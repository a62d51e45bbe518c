//! Utiliteur is a ledger for the utility bills of a household or a small
//! rental property.
//!
//! Bills are attributed to billing months with a cutoff rule: a bill received
//! on or before the billing day stays in the month it arrived, a later bill
//! rolls forward into the next month. Closing a billing month settles all of
//! its bills in one step and freezes them; a closed month must be reopened
//! before any of its bills can change. The expected-bill report shows, per
//! active utility type and calendar month, whether a bill ever arrived.
//!
//! The library is organized as store traits over a SQLite backend, with the
//! [Ledger](ledger::Ledger) service enforcing the rules that span stores.

#![warn(missing_docs)]

pub mod calendar;
pub mod db;
mod error;
pub mod ledger;
pub mod models;
pub mod report;
pub mod stores;

pub use db::initialize as initialize_db;
pub use error::Error;
