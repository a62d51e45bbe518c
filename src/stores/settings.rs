//! Defines the settings store trait.

use crate::{Error, models::Settings};

/// Stores the application settings singleton.
pub trait SettingsStore {
    /// Retrieve the settings. The row is seeded at database creation, so
    /// this only fails on an SQL error.
    fn get(&self) -> Result<Settings, Error>;

    /// Replace the settings.
    fn update(&mut self, settings: &Settings) -> Result<(), Error>;
}
