// src/config.rs
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_LOCALE: &str = "en";
pub const FALLBACK_LOCALE: &str = "en";
pub const STORAGE_KEY: &str = "options";
pub const STORAGE_FIELD: &str = "language";
pub const LANGUAGE_CHANGED_EVENT: &str = "languageChanged";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct I18nConfig {
    /// Used when neither a stored preference nor the host locale is usable.
    pub default_locale: String,
    /// Consulted for keys the active locale lacks.
    pub fallback_locale: String,
    /// Preference-store key holding the JSON options object.
    pub storage_key: String,
    /// Field of the options object that carries the locale code.
    pub storage_field: String,
    /// Name of the DOM event dispatched on locale change.
    pub event_name: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: DEFAULT_LOCALE.to_string(),
            fallback_locale: FALLBACK_LOCALE.to_string(),
            storage_key: STORAGE_KEY.to_string(),
            storage_field: STORAGE_FIELD.to_string(),
            event_name: LANGUAGE_CHANGED_EVENT.to_string(),
        }
    }
}

impl I18nConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        info!("I18n config loaded from {:?}", path);
        Ok(config)
    }
}
