use std::{collections::BTreeSet, fmt, sync::Arc};

use thiserror::Error;

use crate::tree::{Node, NodeKind, NodeRef};

/// A converter that could not handle the node it was selected for.
///
/// The pipeline keeps going: the failure becomes a
/// [`crate::Warning::PluginConversion`] and the node falls back to built-in
/// handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConvertError(pub String);

impl ConvertError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type ParseFn = dyn Fn(NodeRef<'_>) -> Result<Node, ConvertError> + Send + Sync;
pub type SerializeFn = dyn Fn(NodeRef<'_>) -> Result<String, ConvertError> + Send + Sync;
pub type PredicateFn = dyn Fn(NodeRef<'_>) -> bool + Send + Sync;

/// Chooses the nodes a converter applies to.
#[derive(Clone)]
pub enum Selector {
    Kind(NodeKind),
    /// Code blocks whose info string starts with this language.
    Fence(String),
    Predicate(Arc<PredicateFn>),
}

impl Selector {
    pub fn predicate(f: impl Fn(NodeRef<'_>) -> bool + Send + Sync + 'static) -> Self {
        Selector::Predicate(Arc::new(f))
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        match self {
            Selector::Kind(kind) => node.kind() == kind,
            Selector::Fence(language) => {
                *node.kind() == NodeKind::Code && node.attr("language") == Some(language.as_str())
            }
            Selector::Predicate(f) => f(node),
        }
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Kind(kind) => write!(f, "Kind({kind})"),
            Selector::Fence(language) => write!(f, "Fence({language})"),
            Selector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Markdown-to-tree converter: rewrites the payload of a selected node.
#[derive(Clone)]
pub struct ParseConverter {
    pub name: String,
    pub selector: Selector,
    convert: Arc<ParseFn>,
}

impl ParseConverter {
    pub fn new(
        name: impl Into<String>,
        selector: Selector,
        convert: impl Fn(NodeRef<'_>) -> Result<Node, ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            convert: Arc::new(convert),
        }
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        self.selector.matches(node)
    }

    pub fn convert(&self, node: NodeRef<'_>) -> Result<Node, ConvertError> {
        (self.convert)(node)
    }
}

impl fmt::Debug for ParseConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseConverter")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// Tree-to-Markdown converter: produces the complete Markdown for a node.
#[derive(Clone)]
pub struct SerializeConverter {
    pub name: String,
    pub selector: Selector,
    convert: Arc<SerializeFn>,
}

impl SerializeConverter {
    pub fn new(
        name: impl Into<String>,
        selector: Selector,
        convert: impl Fn(NodeRef<'_>) -> Result<String, ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            selector,
            convert: Arc::new(convert),
        }
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        self.selector.matches(node)
    }

    pub fn convert(&self, node: NodeRef<'_>) -> Result<String, ConvertError> {
        (self.convert)(node)
    }
}

impl fmt::Debug for SerializeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializeConverter")
            .field("name", &self.name)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// A plugin: converters for both directions plus the fence languages it
/// claims as element kinds. Pure configuration.
#[derive(Debug, Clone, Default)]
pub struct PluginDescriptor {
    pub name: String,
    pub parse_markdown: Vec<ParseConverter>,
    pub to_markdown: Vec<SerializeConverter>,
    pub element_kinds: BTreeSet<String>,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parse(mut self, converter: ParseConverter) -> Self {
        self.parse_markdown.push(converter);
        self
    }

    pub fn with_serialize(mut self, converter: SerializeConverter) -> Self {
        self.to_markdown.push(converter);
        self
    }

    pub fn with_element_kind(mut self, kind: impl Into<String>) -> Self {
        self.element_kinds.insert(kind.into());
        self
    }
}
