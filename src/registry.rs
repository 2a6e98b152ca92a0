// src/registry.rs
use crate::store::Bundle;
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub code: String,
    pub name: String,
    pub native_name: String,
}

impl Locale {
    pub fn new(code: impl Into<String>, name: impl Into<String>, native_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            native_name: native_name.into(),
        }
    }
}

/// Ordered, read-only catalog of the locales the UI can be displayed in.
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    locales: Vec<Locale>,
}

impl LocaleRegistry {
    pub fn new(locales: Vec<Locale>) -> Result<Self> {
        for (i, locale) in locales.iter().enumerate() {
            if locales[..i].iter().any(|l| l.code == locale.code) {
                return Err(Error::DuplicateLocale(locale.code.clone()));
            }
        }
        Ok(Self { locales })
    }

    /// Registry of the embedded bundle (`en`, `zh`).
    pub fn builtin() -> Result<Self> {
        Self::new(Bundle::embedded()?.locales)
    }

    pub fn get(&self, code: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn all(&self) -> &[Locale] {
        &self.locales
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(|l| l.code.as_str())
    }
}
