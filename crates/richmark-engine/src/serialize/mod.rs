//! # Serialization
//!
//! [`Document`] back to Markdown, the inverse of [`crate::parsing`].
//!
//! ## Modules
//!
//! - **`inline`**: mark runs, inline leaves, the read-back check
//! - **`escape`**: escaping for text, labels, line starts and headings
//!
//! ## Key Invariants
//!
//! - A serialize converter from the registry wins over built-in output; a
//!   failing converter falls back to it with a warning
//! - Blocks are separated by one blank line; non-empty output ends in a
//!   single newline
//! - Output parses back to the same tree (modulo whitespace), and
//!   serializing that tree again yields the same text

pub mod escape;
pub mod inline;

use crate::{
    parsing::blocks::kinds::{
        Alignment, CodeFence, FenceKind, FootnoteDef, FrontMatter, MathBlock, ThematicBreak,
    },
    plugins::PluginRegistry,
    tree::{Document, NodeKind, NodeRef},
    warning::Warning,
};

use escape::{escape_heading_end, escape_line_start};

#[derive(Debug, Clone, PartialEq)]
pub struct SerializeResult {
    pub markdown: String,
    pub warnings: Vec<Warning>,
}

pub fn serialize(tree: &Document, registry: &PluginRegistry) -> String {
    serialize_with_warnings(tree, registry).markdown
}

pub fn serialize_with_warnings(tree: &Document, registry: &PluginRegistry) -> SerializeResult {
    let mut serializer = Serializer {
        registry,
        warnings: Vec::new(),
    };
    let body = serializer.block(tree.root_ref());
    let markdown = if body.is_empty() { body } else { format!("{body}\n") };
    log::debug!(
        "serialized {} nodes into {} bytes",
        tree.arena_len(),
        markdown.len()
    );
    SerializeResult {
        markdown,
        warnings: serializer.warnings,
    }
}

/// Kinds that only ever appear inside a block's inline content.
fn is_inline(kind: &NodeKind) -> bool {
    !kind.is_block() && !kind.is_custom()
}

fn opens_document(node: NodeRef<'_>) -> bool {
    node.parent().is_some_and(|p| {
        *p.kind() == NodeKind::Document && p.children().next().map(|c| c.id()) == Some(node.id())
    })
}

/// Blocks that may follow a paragraph line directly without being absorbed
/// into it.
fn interrupts_paragraph(node: NodeRef<'_>) -> bool {
    match node.kind() {
        NodeKind::List => {
            node.attr("ordered") != Some("true") || node.attr("start").is_none_or(|s| s == "1")
        }
        NodeKind::Code
        | NodeKind::Heading
        | NodeKind::Blockquote
        | NodeKind::ThematicBreak
        | NodeKind::MathBlock
        | NodeKind::Table
        | NodeKind::FootnoteDef => true,
        _ => false,
    }
}

pub(crate) struct Serializer<'a> {
    registry: &'a PluginRegistry,
    warnings: Vec<Warning>,
}

impl<'a> Serializer<'a> {
    /// Output of the first matching serialize converter, if it succeeds.
    fn converted(&mut self, node: NodeRef<'_>) -> Option<String> {
        let converter = self.registry.find_serialize(node)?;
        match converter.convert(node) {
            Ok(markdown) => Some(markdown),
            Err(e) => {
                let warning = Warning::PluginConversion {
                    plugin: converter.name.clone(),
                    node: node.id(),
                    message: e.to_string(),
                };
                log::warn!("{warning}");
                self.warnings.push(warning);
                None
            }
        }
    }

    fn block(&mut self, node: NodeRef<'a>) -> String {
        if let Some(converted) = self.converted(node) {
            return converted;
        }
        match node.kind() {
            NodeKind::Document => self.blocks(node, "\n\n"),
            NodeKind::Paragraph => self.paragraph(&node.children().collect::<Vec<_>>()),
            NodeKind::Heading => self.heading(node),
            NodeKind::Code => code(node),
            NodeKind::MathBlock if node.text().is_empty() => format!("{d}\n{d}", d = MathBlock::DELIM),
            NodeKind::MathBlock => format!("{d}\n{}\n{d}", node.text(), d = MathBlock::DELIM),
            NodeKind::Table => self.table(node),
            NodeKind::List => self.list(node),
            NodeKind::ListItem => self.item_body(node, false),
            NodeKind::Blockquote => {
                let inner = self.blocks(node, "\n\n");
                prefix_lines(&inner, "> ", ">")
            }
            NodeKind::ThematicBreak if opens_document(node) => ThematicBreak::LEADING.to_string(),
            NodeKind::ThematicBreak => ThematicBreak::CANONICAL.to_string(),
            NodeKind::FrontMatter => format!("{d}\n{}\n{d}", node.text(), d = FrontMatter::DELIM),
            NodeKind::FootnoteDef => footnote_def(node),
            // Rows and cells outside a table: their inline content only.
            NodeKind::TableRow | NodeKind::TableCell => self.blocks(node, " "),
            _ if !node.text().is_empty() => self.paragraph(&[node]),
            _ if is_inline(node.kind()) => self.paragraph(&[node]),
            _ => self.blocks(node, "\n\n"),
        }
    }

    /// Renders block children joined by `sep`. Runs of inline children are
    /// written as one paragraph; blocks that render empty are skipped.
    fn blocks(&mut self, node: NodeRef<'a>, sep: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut run: Vec<NodeRef<'a>> = Vec::new();
        for child in node.children() {
            if is_inline(child.kind()) {
                run.push(child);
                continue;
            }
            if !run.is_empty() {
                parts.push(self.paragraph(&std::mem::take(&mut run)));
            }
            parts.push(self.block(child));
        }
        if !run.is_empty() {
            parts.push(self.paragraph(&run));
        }
        parts.retain(|p| !p.is_empty());
        parts.join(sep)
    }

    fn paragraph(&mut self, nodes: &[NodeRef<'a>]) -> String {
        let text = self.inline_block(nodes, false);
        text.lines()
            .map(escape_line_start)
            .filter(|l| !l.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn heading(&mut self, node: NodeRef<'a>) -> String {
        let level = node
            .attr("level")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, 6);
        let children: Vec<_> = node.children().collect();
        let content = self.inline_block(&children, false).replace('\n', " ");
        let content = escape_heading_end(content.trim());
        let marker = "#".repeat(level);
        if content.is_empty() {
            marker
        } else {
            format!("{marker} {content}")
        }
    }

    fn table(&mut self, node: NodeRef<'a>) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in node.children() {
            let mut cells = Vec::new();
            for cell in row.children() {
                let content: Vec<_> = cell.children().collect();
                cells.push(self.inline_block(&content, true).replace('\n', " "));
            }
            rows.push(cells);
        }
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return String::new();
        }
        let alignments: Vec<Alignment> = node
            .children()
            .next()
            .map(|header| {
                header
                    .children()
                    .map(|cell| Alignment::from_attr(cell.attr("align")))
                    .collect()
            })
            .unwrap_or_default();

        let render_row = |cells: &[String]| {
            let padded: Vec<&str> = (0..width)
                .map(|i| cells.get(i).map_or("", String::as_str))
                .collect();
            format!("| {} |", padded.join(" | "))
        };
        let separator: Vec<String> = (0..width)
            .map(|i| {
                alignments
                    .get(i)
                    .copied()
                    .unwrap_or(Alignment::None)
                    .marker()
                    .to_string()
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(render_row(&rows[0]));
        lines.push(render_row(&separator));
        lines.extend(rows[1..].iter().map(|r| render_row(r)));
        lines.join("\n")
    }

    fn list(&mut self, node: NodeRef<'a>) -> String {
        let ordered = node.attr("ordered") == Some("true");
        let tight = node.attr("tight") != Some("false");
        let start: u64 = node.attr("start").and_then(|s| s.parse().ok()).unwrap_or(1);
        let delimiter = node.attr("delimiter").unwrap_or(".");
        let bullet = node.attr("marker").unwrap_or("-");

        let mut items = Vec::new();
        for (i, item) in node.children().enumerate() {
            let marker = if ordered {
                format!("{}{delimiter}", start + i as u64)
            } else {
                bullet.to_string()
            };
            let mut body = self.item_body(item, tight);
            match item.attr("checked") {
                Some("true") => body = task(body, "[x]"),
                Some("false") => body = task(body, "[ ]"),
                _ => {}
            }
            items.push(list_item(&marker, &body));
        }
        items.join(if tight { "\n" } else { "\n\n" })
    }

    /// Blocks of one item. In a tight list a block that can interrupt a
    /// paragraph follows it on the next line.
    fn item_body(&mut self, item: NodeRef<'a>, tight: bool) -> String {
        let children: Vec<_> = item.children().collect();
        let mut out = String::new();
        let mut run: Vec<NodeRef<'a>> = Vec::new();
        let mut parts: Vec<(String, Option<NodeRef<'a>>)> = Vec::new();
        for child in &children {
            if is_inline(child.kind()) {
                run.push(*child);
                continue;
            }
            if !run.is_empty() {
                parts.push((self.paragraph(&std::mem::take(&mut run)), None));
            }
            parts.push((self.block(*child), Some(*child)));
        }
        if !run.is_empty() {
            parts.push((self.paragraph(&run), None));
        }
        parts.retain(|(p, _)| !p.is_empty());
        for (i, (part, node)) in parts.iter().enumerate() {
            if i > 0 {
                let direct = tight && matches!(node, Some(n) if interrupts_paragraph(*n));
                out.push_str(if direct { "\n" } else { "\n\n" });
            }
            out.push_str(part);
        }
        out
    }
}

fn code(node: NodeRef<'_>) -> String {
    let kind = match node.attr("fence") {
        Some("~") => FenceKind::Tildes,
        _ => FenceKind::Backticks,
    };
    let body = node.text();
    let fence = CodeFence::delimiter_for(kind, body);
    let mut info = node.attr("language").unwrap_or_default().to_string();
    if let Some(meta) = node.attr("meta").filter(|m| !m.is_empty()) {
        info.push(' ');
        info.push_str(meta);
    }
    if body.is_empty() {
        format!("{fence}{info}\n{fence}")
    } else {
        format!("{fence}{info}\n{body}\n{fence}")
    }
}

fn footnote_def(node: NodeRef<'_>) -> String {
    let id = node.attr("id").unwrap_or_default();
    let mut lines = node.text().lines().filter(|l| !l.trim().is_empty());
    let mut out = format!("{}{id}{}", FootnoteDef::OPEN, FootnoteDef::CLOSE);
    if let Some(first) = lines.next() {
        out.push(' ');
        out.push_str(first.trim());
    }
    let indent = " ".repeat(FootnoteDef::CONTINUATION_INDENT);
    for line in lines {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(line.trim());
    }
    out
}

fn task(body: String, marker: &str) -> String {
    if body.is_empty() {
        marker.to_string()
    } else {
        format!("{marker} {body}")
    }
}

/// Writes `marker` before the first line and indents the rest to the
/// item's content column.
fn list_item(marker: &str, body: &str) -> String {
    if body.is_empty() {
        return marker.to_string();
    }
    let indent = " ".repeat(marker.len() + 1);
    let mut out = String::new();
    for (i, line) in body.split('\n').enumerate() {
        if i == 0 {
            out.push_str(marker);
            out.push(' ');
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    out
}

fn prefix_lines(text: &str, prefix: &str, empty: &str) -> String {
    if text.is_empty() {
        return empty.to_string();
    }
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                empty.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
