// src/sync.rs
use crate::dom::{
    DomAdapter, NodeId, SharedDom, ARIA_LABEL_KEY_ATTR, PLACEHOLDER_KEY_ATTR, TEXT_KEY_ATTR,
    TITLE_KEY_ATTR,
};
use crate::translator::Translator;
use tracing::debug;

/// Rewrites every element bound to a translation key. Holds no element
/// index: each pass re-queries the document.
#[derive(Clone)]
pub struct PageSynchronizer {
    translator: Translator,
    dom: SharedDom,
}

impl std::fmt::Debug for PageSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSynchronizer")
            .field("translator", &self.translator)
            .finish()
    }
}

impl PageSynchronizer {
    pub fn new(translator: Translator, dom: SharedDom) -> Self {
        Self { translator, dom }
    }

    /// One synchronization pass. Returns how many bindings were applied.
    pub fn sync_all(&self) -> usize {
        let mut dom = self.dom.borrow_mut();
        let dom = &mut *dom;
        let mut applied = 0;

        for (node, key) in bound(dom, TEXT_KEY_ATTR) {
            let text = self.translator.text(&key);
            if is_text_input(dom, node) {
                dom.set_attribute(node, "placeholder", &text);
            } else {
                dom.set_text(node, &text);
            }
            applied += 1;
        }

        for (node, key) in bound(dom, TITLE_KEY_ATTR) {
            let text = self.translator.text(&key);
            dom.set_attribute(node, "title", &text);
            dom.set_attribute(node, "data-original-title", &text);
            applied += 1;
        }

        for (node, key) in bound(dom, ARIA_LABEL_KEY_ATTR) {
            dom.set_attribute(node, "aria-label", &self.translator.text(&key));
            applied += 1;
        }

        for (node, key) in bound(dom, PLACEHOLDER_KEY_ATTR) {
            dom.set_attribute(node, "placeholder", &self.translator.text(&key));
            applied += 1;
        }

        debug!("Synchronized {} translated binding(s)", applied);
        applied
    }
}

fn bound(dom: &dyn DomAdapter, marker: &str) -> Vec<(NodeId, String)> {
    dom.query_by_attribute(marker)
        .into_iter()
        .filter_map(|node| dom.get_attribute(node, marker).map(|key| (node, key)))
        .collect()
}

const INPUT_TYPES: [&str; 22] = [
    "button", "checkbox", "color", "date", "datetime-local", "email", "file", "hidden", "image",
    "month", "number", "password", "radio", "range", "reset", "search", "submit", "tel", "text",
    "time", "url", "week",
];

/// `<input>` of type text or search. A missing, empty or unknown type
/// counts as text, as it does for the `type` property in browsers.
fn is_text_input(dom: &dyn DomAdapter, node: NodeId) -> bool {
    let is_input = dom
        .tag_name(node)
        .is_some_and(|tag| tag.eq_ignore_ascii_case("input"));
    if !is_input {
        return false;
    }
    let kind = dom
        .get_attribute(node, "type")
        .map(|kind| kind.trim().to_ascii_lowercase())
        .filter(|kind| INPUT_TYPES.contains(&kind.as_str()))
        .unwrap_or_else(|| "text".to_string());
    kind == "text" || kind == "search"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::state::{I18nState, SharedState};
    use crate::store::TranslationStore;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(locale: &str) -> (Rc<RefCell<MemoryDocument>>, SharedState, PageSynchronizer) {
        let doc = MemoryDocument::new().into_shared();
        let state = I18nState::new(locale, "en").into_shared();
        let translator = Translator::new(Rc::new(TranslationStore::builtin().unwrap()), state.clone());
        let sync = PageSynchronizer::new(translator, doc.clone());
        (doc, state, sync)
    }

    #[test]
    fn text_bindings_fill_text_or_input_placeholder() {
        let (doc, _state, sync) = setup("zh");
        let (h, search, plain_input, checkbox) = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            (
                d.append_element(body, "h1", &[("data-i18n", "operations.title")]),
                d.append_element(body, "input", &[("type", "search"), ("data-i18n", "common.search")]),
                d.append_element(body, "input", &[("data-i18n", "common.search")]),
                d.append_element(body, "input", &[("type", "checkbox"), ("data-i18n", "common.search")]),
            )
        };
        assert_eq!(sync.sync_all(), 4);

        let d = doc.borrow();
        assert_eq!(d.text(h), Some("操作"));
        assert_eq!(d.attribute(search, "placeholder"), Some("搜索..."));
        assert_eq!(d.text(search), Some(""));
        assert_eq!(d.attribute(plain_input, "placeholder"), Some("搜索..."));
        assert_eq!(d.text(checkbox), Some("搜索..."));
        assert_eq!(d.attribute(checkbox, "placeholder"), None);
    }

    #[test]
    fn empty_or_unknown_input_type_counts_as_text() {
        let (doc, _state, sync) = setup("en");
        let inputs = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            [
                d.append_element(body, "input", &[("type", ""), ("data-i18n", "common.search")]),
                d.append_element(body, "input", &[("type", "foo"), ("data-i18n", "common.search")]),
                d.append_element(body, "input", &[("type", "SEARCH"), ("data-i18n", "common.search")]),
            ]
        };
        sync.sync_all();

        let d = doc.borrow();
        for input in inputs {
            assert_eq!(d.attribute(input, "placeholder"), Some("Search..."));
            assert_eq!(d.text(input), Some(""));
        }
    }

    #[test]
    fn title_aria_and_placeholder_bindings() {
        let (doc, _state, sync) = setup("en");
        let (btn, area) = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            (
                d.append_element(
                    body,
                    "button",
                    &[("data-i18n-title", "header.options"), ("data-i18n-aria-label", "header.about")],
                ),
                d.append_element(body, "textarea", &[("data-i18n-placeholder", "common.loading")]),
            )
        };
        assert_eq!(sync.sync_all(), 3);

        let d = doc.borrow();
        assert_eq!(d.attribute(btn, "title"), Some("Options"));
        assert_eq!(d.attribute(btn, "data-original-title"), Some("Options"));
        assert_eq!(d.attribute(btn, "aria-label"), Some("About / Support"));
        assert_eq!(d.attribute(area, "placeholder"), Some("Loading..."));
    }

    #[test]
    fn missing_keys_show_raw_key() {
        let (doc, _state, sync) = setup("zh");
        let p = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.append_element(body, "p", &[("data-i18n", "nowhere.to.be.found")])
        };
        sync.sync_all();
        assert_eq!(doc.borrow().text(p), Some("nowhere.to.be.found"));
    }

    #[test]
    fn second_pass_changes_nothing() {
        let (doc, _state, sync) = setup("zh");
        {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.append_element(body, "span", &[("data-i18n", "recipe.title")]);
            d.append_element(body, "a", &[("data-i18n-title", "header.download")]);
        }
        sync.sync_all();
        let html = doc.borrow().to_html();
        let mutations = doc.borrow().mutations();
        let nodes = doc.borrow().node_count();

        sync.sync_all();
        assert_eq!(doc.borrow().to_html(), html);
        assert_eq!(doc.borrow().mutations(), mutations);
        assert_eq!(doc.borrow().node_count(), nodes);
    }

    #[test]
    fn pass_follows_current_locale() {
        let (doc, state, sync) = setup("en");
        let p = {
            let mut d = doc.borrow_mut();
            let body = d.body();
            d.append_element(body, "p", &[("data-i18n", "header.subtitle")])
        };
        sync.sync_all();
        assert_eq!(doc.borrow().text(p), Some("The Cyber Swiss Army Knife"));

        state.borrow_mut().set_current_locale("zh");
        sync.sync_all();
        assert_eq!(doc.borrow().text(p), Some("网络瑞士军刀"));
    }
}
