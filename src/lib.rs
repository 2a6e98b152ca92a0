//! Locale selection, translation lookup and page synchronization for a
//! browser UI.
//!
//! Everything runs on the UI thread: shared state lives in `Rc<RefCell<_>>`
//! and change notifications are delivered synchronously. The page itself is
//! reached only through [`dom::DomAdapter`].

pub mod config;
pub mod dom;
pub mod emitter;
mod i18n;
pub mod registry;
pub mod resolver;
pub mod selector;
pub mod state;
pub mod storage;
pub mod store;
pub mod sync;
pub mod translator;
pub mod utils;

pub use crate::config::I18nConfig;
pub use crate::dom::{dispatch_click, DomAdapter, MemoryDocument, NodeId, SharedDom};
pub use crate::emitter::{ChangeNotifier, LocaleChanged, SubscriptionId};
pub use crate::i18n::{I18n, I18nBuilder};
pub use crate::registry::{Locale, LocaleRegistry};
pub use crate::resolver::LocaleResolver;
pub use crate::selector::{Container, LocaleSelector};
pub use crate::state::{I18nState, SharedState};
pub use crate::storage::{JsonFileStorage, MemoryStorage, PreferenceStore};
pub use crate::store::{Bundle, TranslationNode, TranslationStore, TranslationTree};
pub use crate::sync::PageSynchronizer;
pub use crate::translator::{Params, Translation, Translator};
pub use crate::utils::error::{Error, Result};
pub use crate::utils::locale::{FixedLocale, HostLocale, SystemLocale};
pub use crate::utils::logger::LoggerBuilder;
