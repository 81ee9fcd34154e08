use thiserror::Error;

use crate::footnotes::FootnoteTable;

use super::{
    kind::NodeKind,
    node::{Marks, Node, NodeId, PlaceholderTag},
};

/// Errors from structural operations on a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("the document root cannot be detached or moved")]
    RootImmovable,
    #[error("moving node {node} under {parent} would create a cycle")]
    WouldCycle { node: NodeId, parent: NodeId },
    #[error("index {index} is out of bounds for node {parent} with {len} children")]
    IndexOutOfBounds {
        parent: NodeId,
        index: usize,
        len: usize,
    },
    #[error("node {0} is a {1} leaf and cannot take children")]
    LeafParent(NodeId, NodeKind),
}

/// An arena-backed document tree.
///
/// Nodes refer to each other by [`NodeId`] only. Detached nodes keep their
/// arena slot but are no longer reachable from the root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub footnotes: FootnoteTable,
}

impl Document {
    pub fn new() -> Self {
        let mut root = Node::new(NodeKind::Document);
        root.id = NodeId(0);
        Self {
            nodes: vec![root],
            root: NodeId(0),
            footnotes: FootnoteTable::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutable access to a node's payload.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { doc: self, id })
    }

    /// Number of arena slots, including detached nodes.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Appends `node` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, node: Node) -> Result<NodeId, TreeError> {
        let len = self.check_parent(parent)?.children.len();
        self.insert(parent, len, node)
    }

    /// Inserts `node` at `index` among the children of `parent`.
    pub fn insert(&mut self, parent: NodeId, index: usize, node: Node) -> Result<NodeId, TreeError> {
        let len = self.check_parent(parent)?.children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { parent, index, len });
        }
        let id = self.alloc(node);
        self.link(id, parent, index);
        Ok(id)
    }

    /// Unlinks `id` (and its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmovable);
        }
        let parent = self.get(id).ok_or(TreeError::UnknownNode(id))?.parent;
        if let Some(parent) = parent {
            self.nodes[parent.0].children.retain(|c| *c != id);
        }
        self.nodes[id.0].parent = None;
        Ok(())
    }

    /// Moves `id` to position `index` under `new_parent`.
    ///
    /// Detached nodes may be moved back into the tree. `index` is interpreted
    /// after `id` has been unlinked from its current parent.
    pub fn move_to(&mut self, id: NodeId, new_parent: NodeId, index: usize) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmovable);
        }
        self.get(id).ok_or(TreeError::UnknownNode(id))?;
        self.check_parent(new_parent)?;
        if self.ancestors_and_self(new_parent).any(|a| a == id) {
            return Err(TreeError::WouldCycle {
                node: id,
                parent: new_parent,
            });
        }
        let old_parent = self.nodes[id.0].parent;
        let mut len = self.nodes[new_parent.0].children.len();
        if old_parent == Some(new_parent) {
            len -= 1;
        }
        if index > len {
            return Err(TreeError::IndexOutOfBounds {
                parent: new_parent,
                index,
                len,
            });
        }
        self.detach(id)?;
        self.link(id, new_parent, index);
        Ok(())
    }

    /// Replaces the payload of `id` with that of `node`.
    ///
    /// Identity, parent and children are kept. When the new kind is a leaf
    /// kind, existing children are detached.
    pub fn replace_payload(&mut self, id: NodeId, node: Node) -> Result<(), TreeError> {
        let slot = self.get_mut(id).ok_or(TreeError::UnknownNode(id))?;
        slot.take_payload(node);
        if slot.kind.is_leaf() {
            let orphans = std::mem::take(&mut slot.children);
            for child in orphans {
                self.nodes[child.0].parent = None;
            }
        }
        Ok(())
    }

    /// Pre-order traversal of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.get(id).is_some() { vec![id] } else { vec![] };
        Descendants { doc: self, stack }
    }

    /// True when `id` is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).is_some() && self.ancestors_and_self(id).last() == Some(self.root)
    }

    fn ancestors_and_self(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |cur| self.get(*cur).and_then(|n| n.parent))
    }

    fn check_parent(&self, parent: NodeId) -> Result<&Node, TreeError> {
        let node = self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        if node.kind.is_leaf() {
            return Err(TreeError::LeafParent(parent, node.kind.clone()));
        }
        Ok(node)
    }

    fn alloc(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.id = id;
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        id
    }

    fn link(&mut self, id: NodeId, parent: NodeId, index: usize) {
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, id);
    }

    /// Appends without validation. Used by the tree builder, which only ever
    /// appends to nodes it has just created.
    pub(crate) fn push_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.alloc(node);
        self.link(id, parent, self.nodes[parent.0].children.len());
        id
    }

    pub(crate) fn push_text(&mut self, parent: NodeId, text: &str, marks: Marks) -> NodeId {
        self.push_child(parent, Node::text_leaf(text, marks))
    }

    pub(crate) fn push_tag(&mut self, parent: NodeId, tag: PlaceholderTag, marks: Marks) -> NodeId {
        self.push_child(parent, Node::tag_leaf(tag, marks))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order iterator over a subtree, driven by an explicit stack.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.doc.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}

/// Read-only view of one node together with its document.
///
/// This is what converters and renderers see.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn node(&self) -> &'a Node {
        &self.doc.nodes[self.id.0]
    }

    pub fn kind(&self) -> &'a NodeKind {
        &self.node().kind
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.node().attr(key)
    }

    pub fn text(&self) -> &'a str {
        &self.node().text
    }

    pub fn marks(&self) -> Marks {
        self.node().marks
    }

    pub fn tag(&self) -> Option<&'a PlaceholderTag> {
        self.node().tag.as_ref()
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| NodeRef { doc: self.doc, id })
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.nodes[self.id.0]
            .children
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    /// Concatenated text of this node and all its descendants, in order.
    pub fn text_content(&self) -> String {
        self.doc
            .descendants(self.id)
            .map(|id| self.doc.nodes[id.0].text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let quote = doc.append(root, Node::new(NodeKind::Blockquote)).unwrap();
        let para = doc.append(quote, Node::new(NodeKind::Paragraph)).unwrap();
        doc.append(para, Node::text_leaf("hello", Marks::NONE)).unwrap();
        (doc, quote, para)
    }

    #[test]
    fn ids_follow_arena_order() {
        let (doc, quote, para) = sample();
        assert_eq!(quote, NodeId(1));
        assert_eq!(para, NodeId(2));
        assert_eq!(doc.descendants(doc.root()).collect::<Vec<_>>().len(), 4);
    }

    #[test]
    fn text_content_concatenates_leaves() {
        let (doc, quote, _) = sample();
        assert_eq!(doc.node_ref(quote).unwrap().text_content(), "hello");
    }

    #[test]
    fn move_rejects_cycles() {
        let (mut doc, quote, para) = sample();
        assert_eq!(
            doc.move_to(quote, para, 0),
            Err(TreeError::WouldCycle {
                node: quote,
                parent: para
            })
        );
    }

    #[test]
    fn move_relinks_parent_and_children() {
        let (mut doc, quote, para) = sample();
        let root = doc.root();
        doc.move_to(para, root, 0).unwrap();
        assert_eq!(doc.get(root).unwrap().children(), &[para, quote]);
        assert_eq!(doc.get(para).unwrap().parent(), Some(root));
        assert!(doc.get(quote).unwrap().children().is_empty());
    }

    #[test]
    fn move_within_same_parent_reorders() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.append(root, Node::new(NodeKind::Paragraph)).unwrap();
        let b = doc.append(root, Node::new(NodeKind::Paragraph)).unwrap();
        doc.move_to(a, root, 1).unwrap();
        assert_eq!(doc.get(root).unwrap().children(), &[b, a]);
    }

    #[test]
    fn detach_makes_subtree_unreachable() {
        let (mut doc, quote, para) = sample();
        doc.detach(quote).unwrap();
        assert!(!doc.is_attached(para));
        assert_eq!(doc.descendants(doc.root()).count(), 1);
        assert_eq!(doc.detach(doc.root()), Err(TreeError::RootImmovable));
    }

    #[test]
    fn leaves_refuse_children() {
        let (mut doc, _, para) = sample();
        let leaf = doc.get(para).unwrap().children()[0];
        assert!(matches!(
            doc.append(leaf, Node::new(NodeKind::Text)),
            Err(TreeError::LeafParent(..))
        ));
    }

    #[test]
    fn insert_checks_bounds() {
        let (mut doc, _, para) = sample();
        assert_eq!(
            doc.insert(para, 5, Node::new(NodeKind::Text)),
            Err(TreeError::IndexOutOfBounds {
                parent: para,
                index: 5,
                len: 1
            })
        );
    }

    #[test]
    fn replace_payload_with_leaf_kind_orphans_children() {
        let (mut doc, _, para) = sample();
        let leaf = doc.get(para).unwrap().children()[0];
        doc.replace_payload(para, Node::new(NodeKind::MathBlock).with_text("x"))
            .unwrap();
        let node = doc.get(para).unwrap();
        assert_eq!(node.kind, NodeKind::MathBlock);
        assert_eq!(node.id(), para);
        assert!(node.children().is_empty());
        assert!(!doc.is_attached(leaf));
    }
}
