//! Component catalog and node classification.
//!
//! The engine does not know what a type code means. Traversal needs two
//! traits per type ("branching" and "transparent routing") and the editor
//! honours two placement rules ("root only" and "clonable"). A
//! [`NodeClassifier`] supplies them; [`ComponentCatalog`] is the
//! configuration-driven implementation and [`PredicateClassifier`] wraps
//! plain functions.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::node::NodeType;
use crate::result::Result;

/// Classifies node type codes for the editor and the crawler.
///
/// Nodes without a type code (such as `_root`) are passed as `None`.
pub trait NodeClassifier {
    /// A branching node is resolved through a breadcrumb: traversal needs a
    /// recorded answer to know which edge to follow.
    fn is_branching(&self, node_type: Option<NodeType>) -> bool;

    /// A transparent node is passed through during traversal: its children
    /// count as directly connected to its parent and it is never presented.
    fn is_transparent(&self, node_type: Option<NodeType>) -> bool;

    /// Root-only nodes may only hang directly off `_root`.
    fn is_root_only(&self, _node_type: Option<NodeType>) -> bool {
        false
    }

    /// Whether the node may gain additional parents through `clone`.
    fn is_clonable(&self, _node_type: Option<NodeType>) -> bool {
        true
    }

    /// Display name used in change summaries.
    fn type_name(&self, _node_type: Option<NodeType>) -> Option<&str> {
        None
    }
}

impl<C: NodeClassifier + ?Sized> NodeClassifier for &C {
    fn is_branching(&self, node_type: Option<NodeType>) -> bool {
        (**self).is_branching(node_type)
    }

    fn is_transparent(&self, node_type: Option<NodeType>) -> bool {
        (**self).is_transparent(node_type)
    }

    fn is_root_only(&self, node_type: Option<NodeType>) -> bool {
        (**self).is_root_only(node_type)
    }

    fn is_clonable(&self, node_type: Option<NodeType>) -> bool {
        (**self).is_clonable(node_type)
    }

    fn type_name(&self, node_type: Option<NodeType>) -> Option<&str> {
        (**self).type_name(node_type)
    }
}

/// Catalog entry describing one component type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentKind {
    /// Type code this entry describes.
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Human-readable name ("Question", "Answer", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub branching: bool,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default)]
    pub root_only: bool,
    #[serde(default = "default_clonable")]
    pub clonable: bool,
}

const fn default_clonable() -> bool {
    true
}

impl ComponentKind {
    /// A plain, unnamed, clonable, non-branching component.
    pub fn new(node_type: impl Into<NodeType>) -> Self {
        Self {
            node_type: node_type.into(),
            name: None,
            branching: false,
            transparent: false,
            root_only: false,
            clonable: true,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub const fn branching(mut self) -> Self {
        self.branching = true;
        self
    }

    #[must_use]
    pub const fn transparent(mut self) -> Self {
        self.transparent = true;
        self
    }

    #[must_use]
    pub const fn root_only(mut self) -> Self {
        self.root_only = true;
        self
    }

    #[must_use]
    pub const fn not_clonable(mut self) -> Self {
        self.clonable = false;
        self
    }
}

/// On-disk shape of a catalog: `[[components]]` tables or a
/// `{"components": [...]}` object.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    components: Vec<ComponentKind>,
}

/// Configuration-driven [`NodeClassifier`].
///
/// Type codes absent from the catalog are plain: not branching, not
/// transparent, clonable, placeable anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CatalogFile", into = "CatalogFile")]
pub struct ComponentCatalog {
    kinds: BTreeMap<NodeType, ComponentKind>,
}

impl ComponentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries. Later entries win on duplicate codes.
    pub fn from_components<I>(components: I) -> Self
    where
        I: IntoIterator<Item = ComponentKind>,
    {
        Self {
            kinds: components
                .into_iter()
                .map(|kind| (kind.node_type, kind))
                .collect(),
        }
    }

    /// Add or replace one entry.
    #[must_use]
    pub fn with(mut self, kind: ComponentKind) -> Self {
        self.kinds.insert(kind.node_type, kind);
        self
    }

    /// Parse a catalog from TOML `[[components]]` tables.
    ///
    /// # Errors
    ///
    /// Returns `TomlParseFailed` on malformed input.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str::<CatalogFile>(toml)
            .map(Self::from)
            .map_err(Error::from)
    }

    /// Parse a catalog from a JSON `{"components": [...]}` object.
    ///
    /// # Errors
    ///
    /// Returns `JsonParseFailed` on malformed input.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str::<CatalogFile>(json)
            .map(Self::from)
            .map_err(Error::from)
    }

    /// Load a catalog from a file. A `.json` extension selects JSON,
    /// anything else is read as TOML.
    ///
    /// # Errors
    ///
    /// Returns `FileReadFailed` if the file cannot be read, or a parse error.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::file_read_failed(path, e.to_string()))?;

        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    #[must_use]
    pub fn get(&self, node_type: NodeType) -> Option<&ComponentKind> {
        self.kinds.get(&node_type)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    fn kind(&self, node_type: Option<NodeType>) -> Option<&ComponentKind> {
        node_type.and_then(|code| self.get(code))
    }
}

impl From<CatalogFile> for ComponentCatalog {
    fn from(file: CatalogFile) -> Self {
        Self::from_components(file.components)
    }
}

impl From<ComponentCatalog> for CatalogFile {
    fn from(catalog: ComponentCatalog) -> Self {
        Self {
            components: catalog.kinds.into_values().collect(),
        }
    }
}

impl NodeClassifier for ComponentCatalog {
    fn is_branching(&self, node_type: Option<NodeType>) -> bool {
        self.kind(node_type).is_some_and(|kind| kind.branching)
    }

    fn is_transparent(&self, node_type: Option<NodeType>) -> bool {
        self.kind(node_type).is_some_and(|kind| kind.transparent)
    }

    fn is_root_only(&self, node_type: Option<NodeType>) -> bool {
        self.kind(node_type).is_some_and(|kind| kind.root_only)
    }

    fn is_clonable(&self, node_type: Option<NodeType>) -> bool {
        self.kind(node_type).is_none_or(|kind| kind.clonable)
    }

    fn type_name(&self, node_type: Option<NodeType>) -> Option<&str> {
        self.kind(node_type).and_then(|kind| kind.name.as_deref())
    }
}

/// [`NodeClassifier`] built from two predicates.
///
/// ```
/// use flowgraph_core::{NodeClassifier, NodeType, PredicateClassifier};
///
/// let classifier = PredicateClassifier::new(
///     |t: Option<NodeType>| t == Some(NodeType(100)),
///     |t: Option<NodeType>| t == Some(NodeType(300)),
/// );
/// assert!(classifier.is_branching(Some(NodeType(100))));
/// assert!(!classifier.is_transparent(None));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PredicateClassifier<B, T> {
    branching: B,
    transparent: T,
}

impl<B, T> PredicateClassifier<B, T>
where
    B: Fn(Option<NodeType>) -> bool,
    T: Fn(Option<NodeType>) -> bool,
{
    pub const fn new(branching: B, transparent: T) -> Self {
        Self {
            branching,
            transparent,
        }
    }
}

impl<B, T> NodeClassifier for PredicateClassifier<B, T>
where
    B: Fn(Option<NodeType>) -> bool,
    T: Fn(Option<NodeType>) -> bool,
{
    fn is_branching(&self, node_type: Option<NodeType>) -> bool {
        (self.branching)(node_type)
    }

    fn is_transparent(&self, node_type: Option<NodeType>) -> bool {
        (self.transparent)(node_type)
    }
}
