// src/emitter.rs
use crate::config::LANGUAGE_CHANGED_EVENT;
use crate::dom::SharedDom;
use crate::store::{TranslationStore, TranslationTree};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, error};

/// Payload delivered to subscribers and dispatched as the DOM event detail.
#[derive(Clone, Debug, Serialize)]
pub struct LocaleChanged<'a> {
    pub locale: &'a str,
    pub tree: Option<&'a TranslationTree>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Rc<RefCell<dyn FnMut(&LocaleChanged<'_>)>>;

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
}

/// Synchronous fan-out of locale changes, in subscription order.
///
/// Subscribers added while a notification is being delivered only see later
/// notifications; subscribers removed mid-delivery are skipped. A callback
/// that triggers a nested notification is not re-entered for it.
pub struct ChangeNotifier {
    dom: SharedDom,
    store: Rc<TranslationStore>,
    event_name: String,
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("event_name", &self.event_name)
            .field("subscriber_count", &self.subscribers.borrow().len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new(dom: SharedDom, store: Rc<TranslationStore>) -> Self {
        Self::with_event_name(dom, store, LANGUAGE_CHANGED_EVENT)
    }

    pub fn with_event_name(dom: SharedDom, store: Rc<TranslationStore>, event_name: impl Into<String>) -> Self {
        Self {
            dom,
            store,
            event_name: event_name.into(),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&LocaleChanged<'_>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });
        debug!("Locale change subscriber {:?} registered", id);
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        before != subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscribers.borrow().iter().any(|s| s.id == id)
    }

    pub fn notify(&self, locale: &str) {
        let payload = LocaleChanged {
            locale,
            tree: self.store.get(locale),
        };

        {
            let mut dom = self.dom.borrow_mut();
            dom.set_document_lang(locale);
            match serde_json::to_string(&payload) {
                Ok(detail) => dom.dispatch_event(&self.event_name, &detail),
                Err(e) => error!("Failed to serialize '{}' event: {}", self.event_name, e),
            }
        }

        let snapshot: Vec<(SubscriptionId, Callback)> = self
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, s.callback.clone()))
            .collect();
        debug!(
            "Delivering locale change to '{}' to {} subscriber(s)",
            locale,
            snapshot.len()
        );

        for (id, callback) in snapshot {
            if !self.is_subscribed(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(&payload),
                Err(_) => debug!("Subscriber {:?} is already running; nested notification skipped", id),
            }
        }
    }
}
