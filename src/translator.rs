// src/translator.rs
use crate::state::SharedState;
use crate::store::{TranslationNode, TranslationStore};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::rc::Rc;
use tracing::trace;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("placeholder pattern is valid"));

/// Named interpolation values for `{{name}}` tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name`, replacing an earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl fmt::Display) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builds [`Params`]: `params! { "name" => "Ada", "count" => 3 }`.
#[macro_export]
macro_rules! params {
    () => {
        $crate::translator::Params::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {
        $crate::translator::Params::new()$(.with($name, $value))+
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    List(Vec<String>),
}

impl Translation {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Translation::Text(s) => Some(s.as_str()),
            Translation::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Translation::List(items) => Some(items.as_slice()),
            Translation::Text(_) => None,
        }
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Translation::Text(s) => write!(f, "{}", s),
            Translation::List(items) => write!(f, "{}", items.join("\n")),
        }
    }
}

impl PartialEq<&str> for Translation {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

/// Resolves dot-path keys against the active locale, then the fallback
/// locale, then the key itself. Never fails.
#[derive(Debug, Clone)]
pub struct Translator {
    store: Rc<TranslationStore>,
    state: SharedState,
}

impl Translator {
    pub fn new(store: Rc<TranslationStore>, state: SharedState) -> Self {
        Self { store, state }
    }

    pub fn translate(&self, key: &str, params: &Params) -> Translation {
        match self.lookup(key) {
            Some(TranslationNode::Text(template)) => Translation::Text(interpolate(template, params)),
            Some(TranslationNode::List(items)) => Translation::List(items.clone()),
            _ => Translation::Text(key.to_string()),
        }
    }

    /// Text-only translation; list entries degrade to the raw key.
    pub fn text(&self, key: &str) -> String {
        self.text_with(key, &Params::new())
    }

    pub fn text_with(&self, key: &str, params: &Params) -> String {
        match self.translate(key, params) {
            Translation::Text(s) => s,
            Translation::List(_) => key.to_string(),
        }
    }

    /// List entry for `key`, if one resolves.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.lookup(key) {
            Some(TranslationNode::List(items)) => Some(items.clone()),
            _ => None,
        }
    }

    fn lookup(&self, key: &str) -> Option<&TranslationNode> {
        let state = self.state.borrow();
        let node = self
            .store
            .resolve(state.current_locale(), key)
            .or_else(|| self.store.resolve(state.fallback_locale(), key));
        if node.is_none() {
            trace!("Missing translation for '{}'", key);
        }
        node
    }
}

/// Single pass over `{{name}}` tokens; tokens without a value are kept.
fn interpolate(template: &str, params: &Params) -> String {
    if params.is_empty() {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
