//! Nested, serde-friendly form of a [`Document`].
//!
//! The arena is an in-memory representation; anything crossing a process
//! boundary (CLI output, host editors, persisted drafts) uses [`DocumentTree`].

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::footnotes::{FootnoteEntry, FootnoteTable};

use super::{
    document::Document,
    kind::NodeKind,
    node::{Marks, Node, NodeId, PlaceholderTag, TagValue},
};

/// Trees nested deeper than this are refused on import.
pub const MAX_IMPORT_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("root node must be of kind document, found {0}")]
    RootKind(NodeKind),
    #[error("{kind} node cannot have children")]
    LeafWithChildren { kind: NodeKind },
    #[error("placeholder-tag node is missing its placeholder name")]
    MissingPlaceholder,
    #[error("placeholder value must be a string, number, boolean or null, found {0}")]
    InvalidTagValue(String),
    #[error("tree is nested deeper than {} levels", MAX_IMPORT_DEPTH)]
    TooDeep,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Keeps `"value": null` distinguishable from a missing key.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<serde_json::Value>, D::Error> {
    serde_json::Value::deserialize(d).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<usize>,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Marks::is_empty")]
    pub marks: Marks,
    #[serde(default, skip_serializing_if = "is_false")]
    pub tag: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeTree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTree {
    pub root: NodeTree,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub footnotes: IndexMap<String, FootnoteEntry>,
}

fn value_to_json(value: &TagValue) -> serde_json::Value {
    match value {
        TagValue::Text(s) => serde_json::Value::String(s.clone()),
        // JSON has no undefined; both collapse to null on the wire.
        TagValue::Null | TagValue::Undefined => serde_json::Value::Null,
    }
}

fn value_from_json(value: &serde_json::Value) -> Result<TagValue, ImportError> {
    match value {
        serde_json::Value::Null => Ok(TagValue::Null),
        serde_json::Value::String(s) => Ok(TagValue::Text(s.clone())),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => {
            Ok(TagValue::Text(value.to_string()))
        }
        other => Err(ImportError::InvalidTagValue(other.to_string())),
    }
}

impl Document {
    /// Nested copy of the reachable tree.
    pub fn to_tree(&self) -> DocumentTree {
        DocumentTree {
            root: self.node_tree(self.root()),
            footnotes: self
                .footnotes
                .iter()
                .map(|(id, entry)| (id.clone(), entry.clone()))
                .collect(),
        }
    }

    fn node_tree(&self, id: NodeId) -> NodeTree {
        let Some(node) = self.get(id) else {
            return NodeTree::from(&Node::new(NodeKind::Document));
        };
        let mut tree = NodeTree::from(node);
        tree.id = Some(id.0);
        tree.children = node.children().iter().map(|c| self.node_tree(*c)).collect();
        tree
    }

    /// Builds a fresh arena from a nested tree. Incoming ids are ignored and
    /// reassigned in pre-order.
    pub fn from_tree(tree: &DocumentTree) -> Result<Document, ImportError> {
        if tree.root.kind != NodeKind::Document {
            return Err(ImportError::RootKind(tree.root.kind.clone()));
        }
        let mut doc = Document::new();
        let root = doc.root();
        if let Some(slot) = doc.get_mut(root) {
            slot.take_payload(tree.root.to_node()?);
        }
        // Explicit stack so hostile input cannot exhaust the call stack.
        let mut stack: Vec<(NodeId, &NodeTree, usize)> = tree
            .root
            .children
            .iter()
            .rev()
            .map(|c| (root, c, 1))
            .collect();
        while let Some((parent, child, depth)) = stack.pop() {
            if depth > MAX_IMPORT_DEPTH {
                return Err(ImportError::TooDeep);
            }
            let node = child.to_node()?;
            if node.kind.is_leaf() && !child.children.is_empty() {
                return Err(ImportError::LeafWithChildren { kind: node.kind });
            }
            let id = doc.push_child(parent, node);
            stack.extend(child.children.iter().rev().map(|c| (id, c, depth + 1)));
        }
        doc.footnotes = FootnoteTable::from_entries(tree.footnotes.clone());
        Ok(doc)
    }
}

impl NodeTree {
    fn to_node(&self) -> Result<Node, ImportError> {
        let mut node = Node::new(self.kind.clone()).with_text(self.text.clone());
        node.attrs = self.attrs.clone();
        node.marks = self.marks;
        if self.tag || self.kind == NodeKind::PlaceholderTag {
            let placeholder = self
                .placeholder
                .clone()
                .ok_or(ImportError::MissingPlaceholder)?;
            node.tag = Some(PlaceholderTag {
                placeholder,
                value: self.value.as_ref().map(value_from_json).transpose()?,
                initial_value: self.initial_value.clone(),
            });
        }
        Ok(node)
    }
}

impl From<&Node> for NodeTree {
    fn from(node: &Node) -> Self {
        let tag = node.tag.as_ref();
        NodeTree {
            id: None,
            kind: node.kind.clone(),
            attrs: node.attrs.clone(),
            text: node.text.clone(),
            marks: node.marks,
            tag: tag.is_some(),
            placeholder: tag.map(|t| t.placeholder.clone()),
            value: tag.and_then(|t| t.value.as_ref()).map(value_to_json),
            initial_value: tag.and_then(|t| t.initial_value.clone()),
            children: Vec::new(),
        }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_tree().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn null_value_is_present_but_missing_value_is_absent() {
        let with_null: NodeTree = serde_json::from_value(json!({
            "kind": "placeholder-tag", "tag": true, "placeholder": "p", "value": null
        }))
        .unwrap();
        let without: NodeTree = serde_json::from_value(json!({
            "kind": "placeholder-tag", "tag": true, "placeholder": "p"
        }))
        .unwrap();

        assert_eq!(with_null.value, Some(serde_json::Value::Null));
        assert_eq!(without.value, None);
        assert_eq!(
            with_null.to_node().unwrap().tag.unwrap().value,
            Some(TagValue::Null)
        );
        assert_eq!(without.to_node().unwrap().tag.unwrap().value, None);
    }

    #[test]
    fn import_reassigns_ids_in_preorder() {
        let tree: DocumentTree = serde_json::from_value(json!({
            "root": {
                "id": 40,
                "kind": "document",
                "children": [
                    {"id": 7, "kind": "paragraph", "children": [
                        {"kind": "text", "text": "a", "marks": {"bold": true}}
                    ]},
                    {"kind": "thematic-break"}
                ]
            }
        }))
        .unwrap();

        let doc = Document::from_tree(&tree).unwrap();
        let ids: Vec<_> = doc.descendants(doc.root()).map(|id| id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(doc.get(NodeId(2)).unwrap().marks.bold);
        assert_eq!(doc.to_tree().root.children[1].kind, NodeKind::ThematicBreak);
    }

    #[test]
    fn import_rejects_children_on_leaves() {
        let tree: DocumentTree = serde_json::from_value(json!({
            "root": {"kind": "document", "children": [
                {"kind": "text", "text": "a", "children": [{"kind": "text"}]}
            ]}
        }))
        .unwrap();
        assert_eq!(
            Document::from_tree(&tree).unwrap_err(),
            ImportError::LeafWithChildren {
                kind: NodeKind::Text
            }
        );
    }

    #[test]
    fn import_rejects_non_document_root() {
        let tree: DocumentTree =
            serde_json::from_value(json!({"root": {"kind": "paragraph"}})).unwrap();
        assert!(matches!(
            Document::from_tree(&tree),
            Err(ImportError::RootKind(NodeKind::Paragraph))
        ));
    }
}
