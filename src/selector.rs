// src/selector.rs
use crate::dom::{DomAdapter, NodeId, SharedDom};
use crate::emitter::{ChangeNotifier, SubscriptionId};
use crate::registry::LocaleRegistry;
use crate::resolver::LocaleResolver;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{debug, info};

const ACTIVE_CLASS: &str = "active";
const TOGGLE_ID: &str = "languageDropdown";

/// Where to mount the selector: an element id or an element handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container<'a> {
    Id(&'a str),
    Node(NodeId),
}

impl<'a> From<&'a str> for Container<'a> {
    fn from(id: &'a str) -> Self {
        Container::Id(id)
    }
}

impl From<NodeId> for Container<'_> {
    fn from(node: NodeId) -> Self {
        Container::Node(node)
    }
}

struct SelectorView {
    container: NodeId,
    root: NodeId,
    label: NodeId,
    options: Vec<(String, NodeId)>,
}

struct SelectorInner {
    resolver: Rc<LocaleResolver>,
    notifier: Rc<ChangeNotifier>,
    dom: SharedDom,
    view: RefCell<Option<SelectorView>>,
    subscription: Cell<Option<SubscriptionId>>,
}

/// Dropdown for switching the display locale.
///
/// Unmounted until [`LocaleSelector::mount`] finds its container. Once
/// mounted it repaints on every locale change, whoever triggered it.
pub struct LocaleSelector {
    inner: Rc<SelectorInner>,
}

impl std::fmt::Debug for LocaleSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleSelector")
            .field("mounted", &self.is_mounted())
            .field("subscription", &self.inner.subscription.get())
            .finish()
    }
}

impl LocaleSelector {
    pub fn new(resolver: Rc<LocaleResolver>, notifier: Rc<ChangeNotifier>, dom: SharedDom) -> Self {
        Self {
            inner: Rc::new(SelectorInner {
                resolver,
                notifier,
                dom,
                view: RefCell::new(None),
                subscription: Cell::new(None),
            }),
        }
    }

    /// Renders into `container`, replacing its children. Returns `false`
    /// without touching the document if the container does not exist.
    pub fn mount<'a>(&self, container: impl Into<Container<'a>>) -> bool {
        let inner = &self.inner;
        let container = container.into();
        let target = {
            let dom = inner.dom.borrow();
            match container {
                Container::Id(id) => dom.element_by_id(id),
                Container::Node(node) => dom.contains(node).then_some(node),
            }
        };
        let Some(target) = target else {
            debug!("Language selector container {:?} not found", container);
            return false;
        };

        let previous = inner.view.borrow_mut().take();
        let current = inner.resolver.current();
        let view = {
            let mut dom = inner.dom.borrow_mut();
            if let Some(previous) = previous.filter(|view| view.container != target) {
                dom.clear_children(previous.container);
            }
            let view = render(&mut *dom, target, inner.resolver.registry(), &current);
            for (code, node) in &view.options {
                let weak = Rc::downgrade(inner);
                let code = code.clone();
                dom.set_click_handler(
                    *node,
                    Rc::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            inner.select(&code);
                        }
                    }),
                );
            }
            view
        };
        *inner.view.borrow_mut() = Some(view);

        if let Some(previous) = inner.subscription.take() {
            inner.notifier.unsubscribe(previous);
        }
        let weak = Rc::downgrade(inner);
        let id = inner.notifier.subscribe(move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.repaint();
            }
        });
        inner.subscription.set(Some(id));

        info!("Language selector mounted with '{}' active", current);
        true
    }

    /// Removes the rendered markup and stops listening for changes.
    pub fn unmount(&self) {
        let view = self.inner.view.borrow_mut().take();
        if let Some(view) = view {
            self.inner.dom.borrow_mut().clear_children(view.container);
        }
        if let Some(id) = self.inner.subscription.take() {
            self.inner.notifier.unsubscribe(id);
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.view.borrow().is_some()
    }

    /// Same as clicking the option for `code`.
    pub fn select(&self, code: &str) -> bool {
        self.inner.select(code)
    }

    pub fn repaint(&self) {
        self.inner.repaint();
    }

    pub fn option_node(&self, code: &str) -> Option<NodeId> {
        self.inner.view.borrow().as_ref().and_then(|view| {
            view.options
                .iter()
                .find(|(c, _)| c == code)
                .map(|(_, node)| *node)
        })
    }

    pub fn label_node(&self) -> Option<NodeId> {
        self.inner.view.borrow().as_ref().map(|view| view.label)
    }
}

impl SelectorInner {
    fn select(&self, code: &str) -> bool {
        if code == self.resolver.current() {
            debug!("Locale '{}' already active", code);
            return false;
        }
        self.resolver.set_locale(code)
    }

    fn repaint(&self) {
        let view = self.view.borrow();
        let Some(view) = view.as_ref() else {
            return;
        };
        let current = self.resolver.current();
        let mut dom = self.dom.borrow_mut();
        if !dom.contains(view.root) {
            debug!("Language selector is no longer attached; skipping repaint");
            return;
        }
        dom.set_text(view.label, &native_name(self.resolver.registry(), &current));
        for (code, node) in &view.options {
            dom.toggle_class(*node, ACTIVE_CLASS, *code == current);
        }
    }
}

impl Drop for SelectorInner {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.notifier.unsubscribe(id);
        }
    }
}

fn native_name(registry: &LocaleRegistry, code: &str) -> String {
    registry
        .get(code)
        .map(|l| l.native_name.clone())
        .unwrap_or_else(|| code.to_string())
}

fn element(dom: &mut dyn DomAdapter, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
    let node = dom.create_element(tag);
    for (name, value) in attributes {
        dom.set_attribute(node, name, value);
    }
    dom.append_child(parent, node);
    node
}

fn render(dom: &mut dyn DomAdapter, container: NodeId, registry: &LocaleRegistry, current: &str) -> SelectorView {
    dom.clear_children(container);

    let root = element(dom, container, "div", &[("class", "language-selector dropdown")]);
    let toggle = element(
        dom,
        root,
        "button",
        &[
            ("class", "btn btn-sm btn-outline-secondary dropdown-toggle"),
            ("type", "button"),
            ("id", TOGGLE_ID),
            ("data-toggle", "dropdown"),
            ("aria-haspopup", "true"),
            ("aria-expanded", "false"),
        ],
    );
    let icon = element(dom, toggle, "i", &[("class", "material-icons")]);
    dom.set_text(icon, "language");
    let label = element(dom, toggle, "span", &[("class", "current-language")]);
    dom.set_text(label, &native_name(registry, current));

    let menu = element(
        dom,
        root,
        "div",
        &[("class", "dropdown-menu"), ("aria-labelledby", TOGGLE_ID)],
    );
    let options = registry
        .all()
        .iter()
        .map(|locale| {
            let class = if locale.code == current {
                "dropdown-item language-option active"
            } else {
                "dropdown-item language-option"
            };
            let option = element(
                dom,
                menu,
                "a",
                &[("class", class), ("href", "#"), ("data-lang", locale.code.as_str())],
            );
            dom.set_text(option, &locale.native_name);
            (locale.code.clone(), option)
        })
        .collect();

    SelectorView {
        container,
        root,
        label,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::I18nConfig;
    use crate::dom::{dispatch_click, MemoryDocument};
    use crate::state::I18nState;
    use crate::storage::MemoryStorage;
    use crate::store::TranslationStore;
    use crate::utils::locale::FixedLocale;

    struct Fixture {
        doc: Rc<RefCell<MemoryDocument>>,
        notifier: Rc<ChangeNotifier>,
        resolver: Rc<LocaleResolver>,
        selector: LocaleSelector,
    }

    fn fixture() -> Fixture {
        let doc = MemoryDocument::new().into_shared();
        {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.append_element(body, "div", &[("id", "language-selector-container")]);
        }
        let store = Rc::new(TranslationStore::builtin().unwrap());
        let notifier = Rc::new(ChangeNotifier::new(doc.clone(), store));
        let resolver = Rc::new(LocaleResolver::new(
            Rc::new(LocaleRegistry::builtin().unwrap()),
            I18nState::new("en", "en").into_shared(),
            Box::new(MemoryStorage::new()),
            Box::new(FixedLocale::none()),
            notifier.clone(),
            &I18nConfig::default(),
        ));
        let selector = LocaleSelector::new(resolver.clone(), notifier.clone(), doc.clone());
        Fixture {
            doc,
            notifier,
            resolver,
            selector,
        }
    }

    #[test]
    fn mount_renders_options_with_active_flag() {
        let f = fixture();
        assert!(f.selector.mount("language-selector-container"));
        assert!(f.selector.is_mounted());

        let d = f.doc.borrow();
        let label = f.selector.label_node().unwrap();
        assert_eq!(d.text(label), Some("English"));
        let en = f.selector.option_node("en").unwrap();
        let zh = f.selector.option_node("zh").unwrap();
        assert!(d.has_class(en, "active"));
        assert!(!d.has_class(zh, "active"));
        assert_eq!(d.text(zh), Some("中文"));
        assert_eq!(d.attribute(zh, "data-lang"), Some("zh"));
        assert!(d.element_by_id("languageDropdown").is_some());
    }

    #[test]
    fn missing_container_leaves_document_untouched() {
        let f = fixture();
        let before = f.doc.borrow().to_html();
        assert!(!f.selector.mount("nope"));
        assert!(!f.selector.is_mounted());
        assert_eq!(f.doc.borrow().to_html(), before);
        assert_eq!(f.notifier.subscriber_count(), 0);
    }

    #[test]
    fn clicking_another_option_switches_and_repaints() {
        let f = fixture();
        f.selector.mount("language-selector-container");
        let zh = f.selector.option_node("zh").unwrap();
        assert!(dispatch_click(&(f.doc.clone() as SharedDom), zh));

        assert_eq!(f.resolver.current(), "zh");
        let d = f.doc.borrow();
        assert_eq!(d.text(f.selector.label_node().unwrap()), Some("中文"));
        assert!(d.has_class(zh, "active"));
        assert!(!d.has_class(f.selector.option_node("en").unwrap(), "active"));
    }

    #[test]
    fn selecting_active_locale_is_a_no_op() {
        let f = fixture();
        f.selector.mount("language-selector-container");
        let mutations = f.doc.borrow().mutations();
        let events = f.doc.borrow().events().len();

        assert!(!f.selector.select("en"));
        assert_eq!(f.doc.borrow().mutations(), mutations);
        assert_eq!(f.doc.borrow().events().len(), events);
    }

    #[test]
    fn repaints_when_locale_changes_elsewhere() {
        let f = fixture();
        f.selector.mount("language-selector-container");
        f.resolver.set_locale("zh");
        let d = f.doc.borrow();
        assert_eq!(d.text(f.selector.label_node().unwrap()), Some("中文"));
    }

    #[test]
    fn remount_keeps_a_single_subscription() {
        let f = fixture();
        f.selector.mount("language-selector-container");
        f.selector.mount("language-selector-container");
        assert_eq!(f.notifier.subscriber_count(), 1);
        assert_eq!(f.doc.borrow().query_by_attribute("data-lang").len(), 2);
    }

    #[test]
    fn mounting_elsewhere_clears_previous_container() {
        let f = fixture();
        let (first, second) = {
            let mut d = f.doc.borrow_mut();
            let body = d.body();
            (
                d.append_element(body, "div", &[("id", "a")]),
                d.append_element(body, "div", &[("id", "b")]),
            )
        };
        assert!(f.selector.mount("a"));
        let stale_zh = f.selector.option_node("zh").unwrap();
        assert!(f.selector.mount("b"));

        let dom: SharedDom = f.doc.clone();
        assert!(!dispatch_click(&dom, stale_zh));
        assert_eq!(f.resolver.current(), "en");

        let d = f.doc.borrow();
        assert!(d.children(first).is_empty());
        assert_eq!(d.children(second).len(), 1);
        assert_eq!(d.query_by_attribute("data-lang").len(), 2);
        assert_eq!(f.notifier.subscriber_count(), 1);
    }

    #[test]
    fn mounts_into_element_handle() {
        let f = fixture();
        let (attached, detached) = {
            let mut d = f.doc.borrow_mut();
            let body = d.body();
            let attached = d.append_element(body, "nav", &[]);
            let detached = d.create_element("div");
            (attached, detached)
        };
        let before = f.doc.borrow().to_html();
        assert!(!f.selector.mount(detached));
        assert!(!f.selector.is_mounted());
        assert_eq!(f.doc.borrow().to_html(), before);

        assert!(f.selector.mount(Container::Node(attached)));
        let zh = f.selector.option_node("zh").unwrap();
        let dom: SharedDom = f.doc.clone();
        assert!(dispatch_click(&dom, zh));
        assert_eq!(f.resolver.current(), "zh");
        assert_eq!(f.doc.borrow().children(attached).len(), 1);
    }

    #[test]
    fn unmount_and_drop_release_subscription() {
        let f = fixture();
        f.selector.mount("language-selector-container");
        f.selector.unmount();
        assert!(!f.selector.is_mounted());
        assert_eq!(f.notifier.subscriber_count(), 0);
        assert!(f.doc.borrow().query_by_attribute("data-lang").is_empty());

        f.selector.mount("language-selector-container");
        drop(f.selector);
        assert_eq!(f.notifier.subscriber_count(), 0);
    }
}
