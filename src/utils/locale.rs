// src/utils/locale.rs

/// Source of the host environment's preferred locale, read once at startup.
pub trait HostLocale {
    fn preferred_locale(&self) -> Option<String>;
}

/// Reads the operating system (or, on wasm, the browser) locale.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocale;

impl HostLocale for SystemLocale {
    fn preferred_locale(&self) -> Option<String> {
        sys_locale::get_locale().map(|locale| locale.replace('_', "-"))
    }
}

/// A host locale supplied by the embedding application, e.g. `navigator.language`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(locale: impl Into<String>) -> Self {
        FixedLocale(Some(locale.into()))
    }

    pub fn none() -> Self {
        FixedLocale(None)
    }
}

impl HostLocale for FixedLocale {
    fn preferred_locale(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Primary language subtag of a tag like `zh-CN` or `zh_CN`, lowercased.
pub fn primary_subtag(tag: &str) -> Option<String> {
    let primary = tag.trim().split(['-', '_']).next()?;
    if primary.is_empty() {
        None
    } else {
        Some(primary.to_ascii_lowercase())
    }
}
