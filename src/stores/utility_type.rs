//! Defines the utility type store trait.

use crate::{
    Error,
    models::{DatabaseID, TypeCode, UtilityType},
};

/// Creates and retrieves the catalog of utility types.
pub trait UtilityTypeStore {
    /// Create a new utility type. New types start active.
    fn create(&mut self, code: TypeCode, name: &str) -> Result<UtilityType, Error>;

    /// Get a utility type by its ID.
    fn get(&self, id: DatabaseID) -> Result<UtilityType, Error>;

    /// Get a utility type by its code.
    fn get_by_code(&self, code: &TypeCode) -> Result<UtilityType, Error>;

    /// Get all utility types ordered by name.
    fn get_all(&self) -> Result<Vec<UtilityType>, Error>;

    /// Get the active utility types ordered by name.
    fn get_active(&self) -> Result<Vec<UtilityType>, Error>;

    /// Mark the utility type `id` inactive.
    ///
    /// Historical bills keep referencing the code; the type only disappears
    /// from new-bill selection and the expected-bill report.
    fn deactivate(&mut self, id: DatabaseID) -> Result<(), Error>;
}
