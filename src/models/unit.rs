//! Defines rental units (apartments) that bills can be attached to.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, models::DatabaseID};

/// The unique display name of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitName(String);

impl UnitName {
    /// Create a unit name from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::EmptyUnitName] if `name` is empty or whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            Err(Error::EmptyUnitName)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Create a unit name without checks, for values read back from the
    /// database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for UnitName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for UnitName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rental unit. At least one unit is active at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// The ID of the unit.
    pub id: DatabaseID,
    /// The unique display name.
    pub name: UnitName,
    /// Whether new bills may be attached to this unit.
    pub is_active: bool,
}

#[cfg(test)]
mod unit_name_tests {
    use crate::Error;

    use super::UnitName;

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(UnitName::new(" Flat 2 ").unwrap().as_str(), "Flat 2");
    }

    #[test]
    fn new_rejects_empty_input() {
        assert_eq!(UnitName::new("  "), Err(Error::EmptyUnitName));
    }
}
