// src/dom.rs
//! Document access for the i18n core.
//!
//! Everything that touches the page goes through [`DomAdapter`], so the
//! same resolver and synchronizer can drive a browser DOM, a webview bridge
//! or the in-memory [`MemoryDocument`] used headless and in tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

/// Marks an element whose text (or text-input placeholder) is a translation key.
pub const TEXT_KEY_ATTR: &str = "data-i18n";
/// Marks an element whose tooltip is a translation key.
pub const TITLE_KEY_ATTR: &str = "data-i18n-title";
/// Marks an element whose accessible label is a translation key.
pub const ARIA_LABEL_KEY_ATTR: &str = "data-i18n-aria-label";
/// Marks an element whose placeholder is a translation key.
pub const PLACEHOLDER_KEY_ATTR: &str = "data-i18n-placeholder";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

pub type ClickHandler = Rc<dyn Fn()>;

pub type SharedDom = Rc<RefCell<dyn DomAdapter>>;

pub trait DomAdapter {
    /// Sets the language attribute of the document root.
    fn set_document_lang(&mut self, lang: &str);

    /// Dispatches a named document-level event with a JSON detail.
    fn dispatch_event(&mut self, _name: &str, _detail: &str) {}

    /// Attached elements carrying `name`, in document order.
    fn query_by_attribute(&self, name: &str) -> Vec<NodeId>;

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Whether `node` exists and is attached to the document.
    fn contains(&self, node: NodeId) -> bool;

    fn tag_name(&self, node: NodeId) -> Option<String>;

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn set_text(&mut self, node: NodeId, text: &str);

    fn create_element(&mut self, tag: &str) -> NodeId;

    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detaches every child of `node`.
    fn clear_children(&mut self, node: NodeId);

    fn set_click_handler(&mut self, node: NodeId, handler: ClickHandler);

    fn click_handler(&self, node: NodeId) -> Option<ClickHandler>;

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get_attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Adds or removes one class, writing only when the class list changes.
    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if self.has_class(node, class) == on {
            return;
        }
        let current = self.get_attribute(node, "class").unwrap_or_default();
        let mut classes: Vec<&str> = current
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        if on {
            classes.push(class);
        }
        self.set_attribute(node, "class", &classes.join(" "));
    }
}

/// Runs the click handler bound to `node`, if any.
///
/// The document borrow is released before the handler runs, so handlers are
/// free to mutate the document.
pub fn dispatch_click(dom: &SharedDom, node: NodeId) -> bool {
    let handler = dom.borrow().click_handler(node);
    match handler {
        Some(handler) => {
            handler();
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

/// Minimal in-memory element tree implementing [`DomAdapter`].
///
/// Text is modelled as a per-element string alongside the children, and
/// [`MemoryDocument::mutations`] counts only writes that changed something.
pub struct MemoryDocument {
    nodes: Vec<Element>,
    root: NodeId,
    body: NodeId,
    handlers: HashMap<NodeId, ClickHandler>,
    events: Vec<(String, String)>,
    mutations: usize,
}

impl fmt::Debug for MemoryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDocument")
            .field("nodes", &self.nodes.len())
            .field("handlers", &self.handlers.len())
            .field("events", &self.events.len())
            .field("mutations", &self.mutations)
            .finish()
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            handlers: HashMap::new(),
            events: Vec::new(),
            mutations: 0,
        };
        doc.root = doc.create_element("html");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.body);
        doc.mutations = 0;
        doc
    }

    pub fn into_shared(self) -> Rc<RefCell<MemoryDocument>> {
        Rc::new(RefCell::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Creates `<tag>` with the given attributes and appends it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let node = self.create_element(tag);
        for (name, value) in attributes {
            self.set_attribute(node, name, value);
        }
        self.append_child(parent, node);
        node
    }

    pub fn lang(&self) -> Option<&str> {
        self.attribute(self.root, "lang")
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.text.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.element(node)
            .map(|el| el.children.as_slice())
            .unwrap_or(&[])
    }

    /// Events dispatched so far, as `(name, detail)` pairs.
    pub fn events(&self) -> &[(String, String)] {
        &self.events
    }

    pub fn mutations(&self) -> usize {
        self.mutations
    }

    pub fn node_count(&self) -> usize {
        self.walk().len()
    }

    /// Serializes the attached tree as HTML, handy for before/after comparisons.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(self.root, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let Some(el) = self.element(node) else {
            return;
        };
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        out.push('>');
        out.push_str(&escape(&el.text));
        for child in &el.children {
            self.write_html(*child, out);
        }
        out.push_str(&format!("</{}>", el.tag));
    }

    fn element(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0)
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0)
    }

    fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            order.push(node);
            if let Some(el) = self.element(node) {
                stack.extend(el.children.iter().rev().copied());
            }
        }
        order
    }

    fn detach_subtree(&mut self, node: NodeId) {
        self.handlers.remove(&node);
        let children = match self.element_mut(node) {
            Some(el) => {
                el.parent = None;
                std::mem::take(&mut el.children)
            }
            None => return,
        };
        for child in children {
            self.detach_subtree(child);
        }
    }
}

impl DomAdapter for MemoryDocument {
    fn set_document_lang(&mut self, lang: &str) {
        let root = self.root;
        self.set_attribute(root, "lang", lang);
    }

    fn dispatch_event(&mut self, name: &str, detail: &str) {
        self.events.push((name.to_string(), detail.to_string()));
    }

    fn query_by_attribute(&self, name: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|node| {
                self.element(*node)
                    .is_some_and(|el| el.attributes.contains_key(name))
            })
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|node| self.attribute(*node, "id") == Some(id))
    }

    fn contains(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.element(current).and_then(|el| el.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node).map(|el| el.tag.to_ascii_uppercase())
    }

    fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.attribute(node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let changed = match self.element_mut(node) {
            Some(el) if el.attributes.get(name).map(String::as_str) != Some(value) => {
                el.attributes.insert(name.to_string(), value.to_string());
                true
            }
            _ => false,
        };
        if changed {
            self.mutations += 1;
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let changed = match self.element_mut(node) {
            Some(el) if el.text != text => {
                el.text = text.to_string();
                true
            }
            _ => false,
        };
        if changed {
            self.mutations += 1;
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        });
        node
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.element(parent).is_none() || self.element(child).is_none() {
            return;
        }
        if let Some(old_parent) = self.element(child).and_then(|el| el.parent) {
            if let Some(el) = self.element_mut(old_parent) {
                el.children.retain(|c| *c != child);
            }
        }
        if let Some(el) = self.element_mut(child) {
            el.parent = Some(parent);
        }
        if let Some(el) = self.element_mut(parent) {
            el.children.push(child);
        }
        self.mutations += 1;
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = match self.element_mut(node) {
            Some(el) if !el.children.is_empty() => std::mem::take(&mut el.children),
            _ => return,
        };
        for child in children {
            self.detach_subtree(child);
        }
        self.mutations += 1;
    }

    fn set_click_handler(&mut self, node: NodeId, handler: ClickHandler) {
        if self.element(node).is_some() {
            self.handlers.insert(node, handler);
        }
    }

    fn click_handler(&self, node: NodeId) -> Option<ClickHandler> {
        self.handlers.get(&node).cloned()
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
