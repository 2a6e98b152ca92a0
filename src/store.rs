// src/store.rs
use crate::registry::Locale;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

const EMBEDDED_BUNDLE: &str = include_str!("../assets/i18n.yml");

/// A node in a locale's namespace tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TranslationNode {
    Text(String),
    List(Vec<String>),
    Tree(TranslationTree),
}

impl From<&str> for TranslationNode {
    fn from(s: &str) -> Self {
        TranslationNode::Text(s.to_string())
    }
}

impl From<String> for TranslationNode {
    fn from(s: String) -> Self {
        TranslationNode::Text(s)
    }
}

impl From<Vec<String>> for TranslationNode {
    fn from(items: Vec<String>) -> Self {
        TranslationNode::List(items)
    }
}

impl From<TranslationTree> for TranslationNode {
    fn from(tree: TranslationTree) -> Self {
        TranslationNode::Tree(tree)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct TranslationTree(BTreeMap<String, TranslationNode>);

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` at a dot-separated path, creating intermediate namespaces.
    /// A leaf sitting where a namespace is needed is replaced by one.
    pub fn insert(&mut self, key: &str, node: impl Into<TranslationNode>) {
        let segments: Vec<&str> = key.split('.').collect();
        self.insert_at(&segments, node.into());
    }

    pub fn with(mut self, key: &str, node: impl Into<TranslationNode>) -> Self {
        self.insert(key, node);
        self
    }

    fn insert_at(&mut self, segments: &[&str], node: TranslationNode) {
        match segments {
            [] => {}
            [leaf] => {
                self.0.insert((*leaf).to_string(), node);
            }
            [head, rest @ ..] => {
                let entry = self
                    .0
                    .entry((*head).to_string())
                    .or_insert_with(|| TranslationNode::Tree(TranslationTree::new()));
                match entry {
                    TranslationNode::Tree(child) => child.insert_at(rest, node),
                    other => {
                        let mut child = TranslationTree::new();
                        child.insert_at(rest, node);
                        *other = TranslationNode::Tree(child);
                    }
                }
            }
        }
    }

    /// Direct child of this namespace.
    pub fn get(&self, segment: &str) -> Option<&TranslationNode> {
        self.0.get(segment)
    }

    /// Walks a dot-separated key. Only leaves resolve: reaching a leaf before
    /// the last segment, a missing segment, or ending on a namespace all miss.
    pub fn lookup(&self, key: &str) -> Option<&TranslationNode> {
        let mut segments = key.split('.');
        let mut node = self.0.get(segments.next()?)?;
        for segment in segments {
            node = match node {
                TranslationNode::Tree(tree) => tree.0.get(segment)?,
                _ => return None,
            };
        }
        match node {
            TranslationNode::Tree(_) => None,
            leaf => Some(leaf),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every leaf key in the tree, as dot paths, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.collect_keys("", &mut keys);
        keys
    }

    fn collect_keys(&self, prefix: &str, out: &mut Vec<String>) {
        for (segment, node) in &self.0 {
            let path = if prefix.is_empty() {
                segment.clone()
            } else {
                format!("{}.{}", prefix, segment)
            };
            match node {
                TranslationNode::Tree(tree) => tree.collect_keys(&path, out),
                _ => out.push(path),
            }
        }
    }
}

/// Locale list plus per-locale dictionaries, as shipped by the host application.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Bundle {
    #[serde(default)]
    pub locales: Vec<Locale>,
    #[serde(default)]
    pub translations: HashMap<String, TranslationTree>,
}

impl Bundle {
    pub fn embedded() -> Result<Self> {
        Self::from_yaml_str(EMBEDDED_BUNDLE)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// One translation tree per locale; read-only once constructed.
#[derive(Debug, Clone, Default)]
pub struct TranslationStore {
    trees: HashMap<String, TranslationTree>,
}

impl TranslationStore {
    pub fn new(trees: HashMap<String, TranslationTree>) -> Self {
        debug!("Translation store created with {} locale(s)", trees.len());
        Self { trees }
    }

    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Bundle::embedded()?.translations))
    }

    pub fn get(&self, locale: &str) -> Option<&TranslationTree> {
        self.trees.get(locale)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.trees.contains_key(locale)
    }

    pub fn resolve(&self, locale: &str, key: &str) -> Option<&TranslationNode> {
        self.trees.get(locale).and_then(|tree| tree.lookup(key))
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.trees.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl FromIterator<(String, TranslationTree)> for TranslationStore {
    fn from_iter<I: IntoIterator<Item = (String, TranslationTree)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
