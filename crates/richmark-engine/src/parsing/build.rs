//! Assembles block events and inline content into a [`Document`], then runs
//! the registry's parse converters over it.

use crate::{
    plugins::PluginRegistry,
    tree::{Document, Node, NodeId, NodeKind},
    warning::Warning,
};

use super::{
    blocks::{BlockEvent, BlockKind, BlockNode, ContainerFrame, ListInfo, TableBlock},
    inline::{InlineNode, parse_inline},
};

/// Builds the arena from a lexed event stream. Nodes are allocated in
/// document order, so ids follow pre-order.
pub struct TreeBuilder {
    doc: Document,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let doc = Document::new();
        let stack = vec![doc.root()];
        Self { doc, stack }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    pub fn push(&mut self, event: &BlockEvent) {
        match event {
            BlockEvent::Open { frame, .. } => {
                let parent = self.current();
                let id = self.doc.push_child(parent, container_node(frame));
                self.stack.push(id);
            }
            BlockEvent::Close => {
                // The root is never popped, even on an unbalanced stream.
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
            }
            BlockEvent::Leaf(block) => self.leaf(block),
        }
    }

    pub fn finish(self) -> Document {
        self.doc
    }

    fn leaf(&mut self, block: &BlockNode) {
        let parent = self.current();
        let base = block.span.start;
        match &block.kind {
            BlockKind::Paragraph { content } => {
                let id = self.doc.push_child(parent, Node::new(NodeKind::Paragraph));
                self.inline(id, base, content);
            }
            BlockKind::Heading { level, content } => {
                let id = self.doc.push_child(
                    parent,
                    Node::new(NodeKind::Heading).with_attr("level", level.to_string()),
                );
                self.inline(id, base, content);
            }
            BlockKind::FencedCode {
                kind,
                language,
                meta,
                body,
                element,
                terminated,
            } => {
                let mut node = Node::new(NodeKind::Code)
                    .with_attr("fence", kind.char().to_string())
                    .with_text(body.as_str());
                if !language.is_empty() {
                    node = node.with_attr("language", language.as_str());
                }
                if !meta.is_empty() {
                    node = node.with_attr("meta", meta.as_str());
                }
                if let Some(element) = element {
                    node = node.with_attr("element", element.as_str());
                }
                if !terminated {
                    node = node.with_attr("unterminated", "true");
                }
                self.doc.push_child(parent, node);
            }
            BlockKind::MathBlock { body, terminated } => {
                let mut node = Node::new(NodeKind::MathBlock).with_text(body.as_str());
                if !terminated {
                    node = node.with_attr("unterminated", "true");
                }
                self.doc.push_child(parent, node);
            }
            BlockKind::Table(table) => self.table(parent, base, table),
            BlockKind::ThematicBreak => {
                self.doc.push_child(parent, Node::new(NodeKind::ThematicBreak));
            }
            BlockKind::FrontMatter { raw } => {
                self.doc
                    .push_child(parent, Node::new(NodeKind::FrontMatter).with_text(raw.as_str()));
            }
            BlockKind::FootnoteDef { id, body } => {
                self.doc.push_child(
                    parent,
                    Node::new(NodeKind::FootnoteDef)
                        .with_attr("id", id.as_str())
                        .with_text(body.as_str()),
                );
            }
        }
    }

    fn table(&mut self, parent: NodeId, base: usize, table: &TableBlock) {
        let id = self.doc.push_child(parent, Node::new(NodeKind::Table));
        let rows = std::iter::once((true, &table.header)).chain(table.rows.iter().map(|r| (false, r)));
        for (header, cells) in rows {
            let mut row = Node::new(NodeKind::TableRow);
            if header {
                row = row.with_attr("header", "true");
            }
            let row = self.doc.push_child(id, row);
            for (col, content) in cells.iter().enumerate() {
                let mut cell = Node::new(NodeKind::TableCell);
                if let Some(align) = table.alignments.get(col).and_then(|a| a.as_attr()) {
                    cell = cell.with_attr("align", align);
                }
                let cell = self.doc.push_child(row, cell);
                self.inline(cell, base, content);
            }
        }
    }

    fn inline(&mut self, parent: NodeId, base: usize, content: &str) {
        let nodes = parse_inline(base, content);
        self.inline_nodes(parent, &nodes);
    }

    fn inline_nodes(&mut self, parent: NodeId, nodes: &[InlineNode]) {
        for node in nodes {
            match node {
                InlineNode::Text { text, marks, .. } => {
                    self.doc.push_text(parent, text, *marks);
                }
                InlineNode::Tag { tag, marks, .. } => {
                    self.doc.push_tag(parent, tag.clone(), *marks);
                }
                InlineNode::Link {
                    href,
                    title,
                    autolink,
                    children,
                    ..
                } => {
                    let mut link = Node::new(NodeKind::Link).with_attr("href", href.as_str());
                    if let Some(title) = title {
                        link = link.with_attr("title", title.as_str());
                    }
                    if *autolink {
                        link = link.with_attr("autolink", "true");
                    }
                    let id = self.doc.push_child(parent, link);
                    self.inline_nodes(id, children);
                }
                InlineNode::Image { src, alt, title, .. } => {
                    let mut image = Node::new(NodeKind::Image)
                        .with_attr("src", src.as_str())
                        .with_attr("alt", alt.as_str());
                    if let Some(title) = title {
                        image = image.with_attr("title", title.as_str());
                    }
                    self.doc.push_child(parent, image);
                }
                InlineNode::InlineMath { tex, .. } => {
                    self.doc
                        .push_child(parent, Node::new(NodeKind::InlineMath).with_text(tex.as_str()));
                }
                InlineNode::FootnoteRef { id, .. } => {
                    self.doc.push_child(
                        parent,
                        Node::new(NodeKind::FootnoteRef).with_attr("id", id.as_str()),
                    );
                }
            }
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn container_node(frame: &ContainerFrame) -> Node {
    match frame {
        ContainerFrame::BlockQuote => Node::new(NodeKind::Blockquote),
        ContainerFrame::List(info) => list_node(info),
        ContainerFrame::ListItem { checked } => {
            let node = Node::new(NodeKind::ListItem);
            match checked {
                Some(checked) => node.with_attr("checked", checked.to_string()),
                None => node,
            }
        }
    }
}

fn list_node(info: &ListInfo) -> Node {
    let node = Node::new(NodeKind::List)
        .with_attr("ordered", info.ordered.to_string())
        .with_attr("tight", info.tight.to_string());
    if info.ordered {
        node.with_attr("start", info.start.to_string())
            .with_attr("delimiter", info.symbol.to_string())
    } else {
        node.with_attr("marker", info.symbol.to_string())
    }
}

/// Builds the tree for a whole event stream.
pub fn build_tree(events: &[BlockEvent]) -> Document {
    let mut builder = TreeBuilder::new();
    for event in events {
        builder.push(event);
    }
    builder.finish()
}

/// Rewrites every reachable node with the first matching parse converter.
///
/// Nodes are visited in pre-order as they were before the pass. A node
/// detached by an earlier rewrite (the child of something that became a
/// leaf) is skipped.
pub fn apply_converters(doc: &mut Document, registry: &PluginRegistry) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if registry.parse_converters().is_empty() {
        return warnings;
    }
    let order: Vec<NodeId> = doc.descendants(doc.root()).collect();
    for id in order {
        if !doc.is_attached(id) {
            continue;
        }
        let Some(node) = doc.node_ref(id) else {
            continue;
        };
        let Some(converter) = registry.find_parse(node) else {
            continue;
        };
        match converter.convert(node) {
            Ok(replacement) => {
                log::debug!("converter '{}' rewrote node {id}", converter.name);
                if let Err(e) = doc.replace_payload(id, replacement) {
                    log::warn!("converter '{}' result dropped: {e}", converter.name);
                }
            }
            Err(e) => {
                let warning = Warning::PluginConversion {
                    plugin: converter.name.clone(),
                    node: id,
                    message: e.to_string(),
                };
                log::warn!("{warning}");
                warnings.push(warning);
            }
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xi_rope::Rope;

    use super::*;
    use crate::{parsing::blocks::lex, tree::invariants};

    fn build(src: &str) -> Document {
        let rope = Rope::from(src);
        let out = lex(&rope, &Default::default());
        let doc = build_tree(&out.events);
        invariants::check(&doc);
        doc
    }

    fn kinds(doc: &Document) -> Vec<String> {
        doc.descendants(doc.root())
            .filter_map(|id| doc.node_ref(id))
            .map(|n| n.kind().to_string())
            .collect()
    }

    #[test]
    fn ids_follow_preorder() {
        let doc = build("# T\n\npara *x*\n");
        let ids: Vec<usize> = doc.descendants(doc.root()).map(|id| id.0).collect();
        assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
        assert_eq!(
            kinds(&doc),
            ["document", "heading", "text", "paragraph", "text", "text"]
        );
    }

    #[test]
    fn list_attributes() {
        let doc = build("3) a\n4) b\n");
        let list = doc.root_ref().children().next().unwrap();
        assert_eq!(list.attr("ordered"), Some("true"));
        assert_eq!(list.attr("start"), Some("3"));
        assert_eq!(list.attr("delimiter"), Some(")"));
        assert_eq!(list.attr("tight"), Some("true"));
        assert_eq!(list.child_count(), 2);
    }

    #[test]
    fn table_rows_and_alignment() {
        let doc = build("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let table = doc.root_ref().children().next().unwrap();
        let rows: Vec<_> = table.children().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].attr("header"), Some("true"));
        let aligns: Vec<_> = rows[1].children().map(|c| c.attr("align")).collect();
        assert_eq!(aligns, [Some("left"), Some("right")]);
        assert_eq!(rows[1].children().next().unwrap().text_content(), "1");
    }

    #[test]
    fn code_attributes() {
        let doc = build("~~~rust ignore\nfn x() {}\n");
        let code = doc.root_ref().children().next().unwrap();
        assert_eq!(code.attr("language"), Some("rust"));
        assert_eq!(code.attr("meta"), Some("ignore"));
        assert_eq!(code.attr("fence"), Some("~"));
        assert_eq!(code.attr("unterminated"), Some("true"));
        assert_eq!(code.text(), "fn x() {}");
    }

    #[test]
    fn unbalanced_close_keeps_root() {
        let doc = build_tree(&[BlockEvent::Close, BlockEvent::Close]);
        invariants::check(&doc);
        assert_eq!(doc.arena_len(), 1);
    }
}
