//! User settings and the applications database.
pub mod appsdb;
pub mod settings;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;

pub use appsdb::{AppDefinition, ApplicationsDatabase};
pub use settings::Settings;

/// Parse a TOML document, labelling parse errors with where the text came from.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidToml`] if the document does not parse.
pub(crate) fn parse_toml<T: DeserializeOwned>(label: &str, text: &str) -> Result<T, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::InvalidToml {
        file: label.to_string(),
        message: e.message().to_string(),
    })
}
