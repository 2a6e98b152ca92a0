// src/resolver.rs
use crate::config::I18nConfig;
use crate::emitter::ChangeNotifier;
use crate::registry::LocaleRegistry;
use crate::state::SharedState;
use crate::storage::PreferenceStore;
use crate::utils::error::Result;
use crate::utils::locale::{primary_subtag, HostLocale};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Picks the startup locale and applies (and remembers) user changes.
///
/// Preference storage is best-effort: unreadable values count as absent and
/// failed writes are logged and dropped, never surfaced to the caller.
pub struct LocaleResolver {
    registry: Rc<LocaleRegistry>,
    state: SharedState,
    preferences: RefCell<Box<dyn PreferenceStore>>,
    host: Box<dyn HostLocale>,
    notifier: Rc<ChangeNotifier>,
    default_locale: String,
    storage_key: String,
    storage_field: String,
}

impl std::fmt::Debug for LocaleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleResolver")
            .field("current", &self.current())
            .field("default_locale", &self.default_locale)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

impl LocaleResolver {
    pub fn new(
        registry: Rc<LocaleRegistry>,
        state: SharedState,
        preferences: Box<dyn PreferenceStore>,
        host: Box<dyn HostLocale>,
        notifier: Rc<ChangeNotifier>,
        config: &I18nConfig,
    ) -> Self {
        Self {
            registry,
            state,
            preferences: RefCell::new(preferences),
            host,
            notifier,
            default_locale: config.default_locale.clone(),
            storage_key: config.storage_key.clone(),
            storage_field: config.storage_field.clone(),
        }
    }

    /// Stored preference, then host locale, then the configured default.
    pub fn resolve_initial(&self) -> String {
        if let Some(code) = self.stored_locale() {
            if self.registry.contains(&code) {
                debug!("Using stored locale '{}'", code);
                return code;
            }
            warn!("Stored locale '{}' is not supported. Ignoring it.", code);
        }
        if let Some(code) = self.host_locale() {
            debug!("Using host locale '{}'", code);
            return code;
        }
        debug!("Using default locale '{}'", self.default_locale);
        self.default_locale.clone()
    }

    /// Resolves the startup locale into the shared state without persisting
    /// or notifying.
    pub fn start(&self) -> String {
        let code = self.resolve_initial();
        self.state.borrow_mut().set_current_locale(code.clone());
        info!("Initial locale is '{}'", code);
        code
    }

    /// Switches the active locale. Returns `false`, with no side effects, for
    /// unsupported codes and for the locale that is already active.
    pub fn set_locale(&self, code: &str) -> bool {
        if !self.registry.contains(code) {
            debug!("Ignoring unsupported locale '{}'", code);
            return false;
        }
        if self.current() == code {
            return false;
        }

        self.state.borrow_mut().set_current_locale(code);
        info!("Locale changed to '{}'", code);

        match self.persist(code) {
            Ok(()) => debug!("Locale preference '{}' saved", code),
            Err(e) => warn!("Language preference could not be saved: {}", e),
        }

        self.notifier.notify(code);
        true
    }

    pub fn current(&self) -> String {
        self.state.borrow().current_locale().to_string()
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    fn stored_locale(&self) -> Option<String> {
        let raw = match self.preferences.borrow().get_item(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read preference '{}': {}", self.storage_key, e);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(options) => options
                .get(&self.storage_field)
                .and_then(Value::as_str)
                .map(str::to_string),
            Err(e) => {
                warn!(
                    "Preference '{}' is not valid JSON ({}). Treating it as unset.",
                    self.storage_key, e
                );
                None
            }
        }
    }

    fn host_locale(&self) -> Option<String> {
        let tag = self.host.preferred_locale()?;
        let primary = primary_subtag(&tag)?;
        if self.registry.contains(&primary) {
            Some(primary)
        } else {
            debug!("Host locale '{}' is not supported", tag);
            None
        }
    }

    fn persist(&self, code: &str) -> Result<()> {
        let mut preferences = self.preferences.borrow_mut();
        let mut options = match preferences.get_item(&self.storage_key)? {
            Some(raw) => serde_json::from_str::<Value>(&raw)?,
            None => Value::Null,
        };
        if !options.is_object() {
            options = Value::Object(Map::new());
        }
        options[self.storage_field.as_str()] = Value::String(code.to_string());
        preferences.set_item(&self.storage_key, &options.to_string())
    }
}
