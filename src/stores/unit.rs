//! Defines the unit store trait.

use crate::{
    Error,
    models::{DatabaseID, Unit, UnitName},
};

/// Creates and retrieves rental units.
pub trait UnitStore {
    /// Create a new unit. New units start active.
    fn create(&mut self, name: UnitName) -> Result<Unit, Error>;

    /// Get a unit by its ID.
    fn get(&self, id: DatabaseID) -> Result<Unit, Error>;

    /// Get all units ordered by name.
    fn get_all(&self) -> Result<Vec<Unit>, Error>;

    /// Get the active units ordered by name.
    fn get_active(&self) -> Result<Vec<Unit>, Error>;

    /// The number of active units.
    fn count_active(&self) -> Result<usize, Error>;

    /// Mark the unit `id` inactive.
    ///
    /// The last-active-unit rule is enforced by the ledger, not here.
    fn deactivate(&mut self, id: DatabaseID) -> Result<(), Error>;
}
