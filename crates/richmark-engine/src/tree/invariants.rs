use std::collections::HashSet;

use super::{document::Document, kind::NodeKind};

/// Validates structural invariants of a document.
///
/// Asserts that:
/// - The root is a `document` node without a parent
/// - Every reachable node is visited once and its parent link points back
///   at the node listing it as a child
/// - Leaf kinds have no children and only text/tag leaves carry marks
/// - Placeholder-tag leaves carry a tag payload and nothing else does
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(doc: &Document) {
    let root = doc.root_ref();
    assert_eq!(root.kind(), &NodeKind::Document, "root is not a document");
    assert!(root.parent().is_none(), "root has a parent");

    let mut seen = HashSet::new();
    for id in doc.descendants(doc.root()) {
        assert!(seen.insert(id), "node {id} reached twice");
        let Some(node) = doc.get(id) else {
            panic!("dangling child id {id}");
        };
        assert_eq!(node.id(), id, "arena slot {id} holds node {}", node.id());
        for child in node.children() {
            let parent = doc.get(*child).and_then(|c| c.parent());
            assert_eq!(parent, Some(id), "child {child} does not point back at {id}");
        }
        if node.kind.is_leaf() {
            assert!(node.children().is_empty(), "{} leaf {id} has children", node.kind);
        }
        if !node.kind.takes_marks() {
            assert!(node.marks.is_empty(), "{} node {id} carries marks", node.kind);
        }
        assert_eq!(
            node.tag.is_some(),
            node.kind == NodeKind::PlaceholderTag,
            "tag payload mismatch on {id}"
        );
    }
}
