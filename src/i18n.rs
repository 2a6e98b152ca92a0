// src/i18n.rs
use crate::config::I18nConfig;
use crate::dom::{MemoryDocument, SharedDom};
use crate::emitter::{ChangeNotifier, LocaleChanged, SubscriptionId};
use crate::registry::LocaleRegistry;
use crate::resolver::LocaleResolver;
use crate::selector::LocaleSelector;
use crate::state::{I18nState, SharedState};
use crate::storage::{MemoryStorage, PreferenceStore};
use crate::store::{Bundle, TranslationStore};
use crate::sync::PageSynchronizer;
use crate::translator::{Params, Translation, Translator};
use crate::utils::error::{Error, Result};
use crate::utils::locale::{HostLocale, SystemLocale};
use std::rc::Rc;
use tracing::info;

const LOADING_MESSAGES_KEY: &str = "loading_messages";

/// Wires the i18n components for one document.
///
/// The page synchronizer is subscribed first, so every locale change rewrites
/// the page before any other subscriber (such as a mounted selector) runs.
pub struct I18n {
    config: I18nConfig,
    registry: Rc<LocaleRegistry>,
    store: Rc<TranslationStore>,
    state: SharedState,
    dom: SharedDom,
    notifier: Rc<ChangeNotifier>,
    resolver: Rc<LocaleResolver>,
    translator: Translator,
    synchronizer: PageSynchronizer,
    sync_subscription: SubscriptionId,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("sync_subscription", &self.sync_subscription)
            .finish()
    }
}

impl I18n {
    pub fn builder() -> I18nBuilder {
        I18nBuilder::new()
    }

    pub fn translate(&self, key: &str, params: &Params) -> Translation {
        self.translator.translate(key, params)
    }

    pub fn t(&self, key: &str) -> String {
        self.translator.text(key)
    }

    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.translator.text_with(key, params)
    }

    pub fn set_locale(&self, code: &str) -> bool {
        self.resolver.set_locale(code)
    }

    pub fn current_locale(&self) -> String {
        self.resolver.current()
    }

    pub fn fallback_locale(&self) -> String {
        self.state.borrow().fallback_locale().to_string()
    }

    pub fn sync_page(&self) -> usize {
        self.synchronizer.sync_all()
    }

    pub fn subscribe(&self, callback: impl FnMut(&LocaleChanged<'_>) + 'static) -> SubscriptionId {
        self.notifier.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// A selector bound to this instance; call [`LocaleSelector::mount`] to show it.
    pub fn language_selector(&self) -> LocaleSelector {
        LocaleSelector::new(self.resolver.clone(), self.notifier.clone(), self.dom.clone())
    }

    /// Rotating status lines for the loading screen, in the active locale.
    pub fn loading_messages(&self) -> Vec<String> {
        self.translator.list(LOADING_MESSAGES_KEY).unwrap_or_default()
    }

    pub fn config(&self) -> &I18nConfig {
        &self.config
    }

    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn synchronizer(&self) -> &PageSynchronizer {
        &self.synchronizer
    }

    pub fn resolver(&self) -> &Rc<LocaleResolver> {
        &self.resolver
    }

    pub fn notifier(&self) -> &Rc<ChangeNotifier> {
        &self.notifier
    }
}

pub struct I18nBuilder {
    config: I18nConfig,
    bundle: Option<Bundle>,
    preferences: Option<Box<dyn PreferenceStore>>,
    host: Option<Box<dyn HostLocale>>,
    dom: Option<SharedDom>,
}

impl Default for I18nBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nBuilder {
    pub fn new() -> Self {
        I18nBuilder {
            config: I18nConfig::default(),
            bundle: None,
            preferences: None,
            host: None,
            dom: None,
        }
    }

    pub fn config(mut self, config: I18nConfig) -> Self {
        self.config = config;
        self
    }

    /// Locales and dictionaries; the embedded bundle is used when unset.
    pub fn bundle(mut self, bundle: Bundle) -> Self {
        self.bundle = Some(bundle);
        self
    }

    pub fn preferences(mut self, preferences: impl PreferenceStore + 'static) -> Self {
        self.preferences = Some(Box::new(preferences));
        self
    }

    pub fn host_locale(mut self, host: impl HostLocale + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn document(mut self, dom: SharedDom) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn build(self) -> Result<I18n> {
        let bundle = match self.bundle {
            Some(bundle) => bundle,
            None => Bundle::embedded()?,
        };
        let config = self.config;

        let registry = Rc::new(LocaleRegistry::new(bundle.locales)?);
        for code in [&config.default_locale, &config.fallback_locale] {
            if !registry.contains(code) {
                return Err(Error::UnknownLocale(code.clone()));
            }
        }
        let store = Rc::new(TranslationStore::new(bundle.translations));
        if !store.contains(&config.fallback_locale) {
            return Err(Error::MissingFallbackTree(config.fallback_locale.clone()));
        }

        let dom: SharedDom = match self.dom {
            Some(dom) => dom,
            None => MemoryDocument::new().into_shared(),
        };
        let preferences: Box<dyn PreferenceStore> = match self.preferences {
            Some(preferences) => preferences,
            None => Box::new(MemoryStorage::new()),
        };
        let host: Box<dyn HostLocale> = match self.host {
            Some(host) => host,
            None => Box::new(SystemLocale),
        };
        let state = I18nState::new(config.default_locale.clone(), config.fallback_locale.clone()).into_shared();
        let notifier = Rc::new(ChangeNotifier::with_event_name(
            dom.clone(),
            store.clone(),
            config.event_name.clone(),
        ));
        let resolver = Rc::new(LocaleResolver::new(
            registry.clone(),
            state.clone(),
            preferences,
            host,
            notifier.clone(),
            &config,
        ));
        resolver.start();

        let translator = Translator::new(store.clone(), state.clone());
        let synchronizer = PageSynchronizer::new(translator.clone(), dom.clone());
        let page = synchronizer.clone();
        let sync_subscription = notifier.subscribe(move |_| {
            page.sync_all();
        });

        info!(
            "I18n ready: {} locale(s), current '{}', fallback '{}'",
            registry.all().len(),
            resolver.current(),
            config.fallback_locale
        );

        Ok(I18n {
            config,
            registry,
            store,
            state,
            dom,
            notifier,
            resolver,
            translator,
            synchronizer,
            sync_subscription,
        })
    }
}
