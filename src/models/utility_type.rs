//! Defines utility types, the catalog of bill kinds (electricity, water, ...).

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, models::DatabaseID};

/// The stable identity key of a utility type, e.g. `electricity`.
///
/// Codes are normalized on creation: trimmed, lowercased, with spaces
/// replaced by underscores. Bills reference types by code, so a code never
/// changes once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeCode(String);

impl TypeCode {
    /// Create a normalized type code from user input.
    ///
    /// # Errors
    /// Returns [Error::EmptyTypeCode] if `code` is empty or whitespace.
    pub fn new(code: &str) -> Result<Self, Error> {
        let normalized = code.trim().to_lowercase().replace(' ', "_");

        if normalized.is_empty() {
            Err(Error::EmptyTypeCode)
        } else {
            Ok(Self(normalized))
        }
    }

    /// Create a type code without normalization or checks.
    ///
    /// Intended for codes read back from the database, which were normalized
    /// when they were written.
    pub fn new_unchecked(code: &str) -> Self {
        Self(code.to_string())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A kind of utility bill, e.g. electricity or waste collection.
///
/// Deactivated types stay referenced by historical bills but are excluded
/// from new-bill selection and from the expected-bill report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityType {
    /// The ID of the utility type.
    pub id: DatabaseID,
    /// The stable identity key bills reference.
    pub code: TypeCode,
    /// The name shown to the user.
    pub name: String,
    /// Whether new bills may use this type.
    pub is_active: bool,
}

#[cfg(test)]
mod type_code_tests {
    use crate::Error;

    use super::TypeCode;

    #[test]
    fn new_normalizes_case_and_spaces() {
        let code = TypeCode::new("  Hot Water ").unwrap();

        assert_eq!(code.as_str(), "hot_water");
    }

    #[test]
    fn new_keeps_simple_codes_as_is() {
        assert_eq!(TypeCode::new("gas").unwrap().as_str(), "gas");
    }

    #[test]
    fn new_rejects_empty_input() {
        assert_eq!(TypeCode::new(""), Err(Error::EmptyTypeCode));
        assert_eq!(TypeCode::new("   "), Err(Error::EmptyTypeCode));
    }
}
