//! Inline content: mark runs, leaves and the read-back check.

use crate::{
    parsing::inline::{
        InlineNode,
        kinds::{
            Autolink, CodeSpan, Emphasis, FootnoteRef, InlineMath, Link, PlaceholderSyntax,
        },
        parse_inline,
    },
    tree::{Mark, Marks, NodeKind, NodeRef, PlaceholderTag},
    warning::Warning,
};

use super::{
    Serializer,
    escape::{escape_all, escape_label, needs_escape},
};

#[derive(Debug, Clone, Copy, Default)]
struct InlineCtx {
    in_table: bool,
    escape_everything: bool,
}

/// `![alt](src "title")`.
pub fn image_markdown(alt: &str, src: &str, title: Option<&str>) -> String {
    format!("![{}]{}", escape_label(alt), Link::render_destination(src, title))
}

/// `[label](href "title")` with an already rendered label.
pub fn link_markdown(label: &str, href: &str, title: Option<&str>) -> String {
    format!("[{label}]{}", Link::render_destination(href, title))
}

impl<'a> Serializer<'a> {
    /// Renders the inline children of one block.
    ///
    /// Text is escaped only where it would read back differently. When the
    /// rendered result does not parse back to the same inline structure
    /// (a stray delimiter pairing with a neighbouring run, say), it is
    /// rendered again with every special character escaped.
    pub(super) fn inline_block(&mut self, nodes: &[NodeRef<'a>], in_table: bool) -> String {
        let warnings = self.warnings.len();
        let ctx = InlineCtx {
            in_table,
            escape_everything: false,
        };
        let markdown = self.render_run(nodes, Marks::NONE, ctx);
        let Some(expected) = signature(nodes) else {
            return markdown;
        };
        if merge(sig_of_parsed(&parse_inline(0, &markdown))) == expected {
            return markdown;
        }
        log::debug!("inline content did not read back unchanged; escaping all text");
        self.warnings.truncate(warnings);
        self.render_run(
            nodes,
            Marks::NONE,
            InlineCtx {
                escape_everything: true,
                ..ctx
            },
        )
    }

    /// Groups consecutive nodes sharing a mark into one delimiter run,
    /// longest run first, so marks nest minimally.
    fn render_run(&mut self, nodes: &[NodeRef<'a>], active: Marks, ctx: InlineCtx) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < nodes.len() {
            let mut best: Option<(Mark, usize)> = None;
            for mark in Mark::NESTING {
                if active.has(mark) || !nodes[i].marks().has(mark) {
                    continue;
                }
                let end = i + nodes[i..].iter().take_while(|n| n.marks().has(mark)).count();
                if best.is_none_or(|(_, e)| end > e) {
                    best = Some((mark, end));
                }
            }
            match best {
                None => {
                    let leaf = self.render_leaf(nodes[i], ctx);
                    out.push_str(&leaf);
                    i += 1;
                }
                Some((mark, end)) => {
                    let inner = self.render_run(&nodes[i..end], active.with(mark), ctx);
                    wrap(&mut out, &inner, Emphasis::canonical(mark));
                    i = end;
                }
            }
        }
        out
    }

    fn render_children(&mut self, node: NodeRef<'a>, ctx: InlineCtx) -> String {
        let children: Vec<_> = node.children().collect();
        self.render_run(&children, Marks::NONE, ctx)
    }

    fn render_leaf(&mut self, node: NodeRef<'a>, ctx: InlineCtx) -> String {
        if let Some(converted) = self.converted(node) {
            return converted;
        }
        match node.kind() {
            NodeKind::Text if node.marks().code => {
                if node.text().is_empty() {
                    String::new()
                } else {
                    CodeSpan::render(node.text())
                }
            }
            NodeKind::Text => self.escape_text(node.text(), ctx),
            NodeKind::PlaceholderTag => match node.tag() {
                Some(tag) => PlaceholderSyntax::render(tag, node.text()),
                None => self.escape_text(node.text(), ctx),
            },
            NodeKind::Link => {
                let href = node.attr("href").unwrap_or_default();
                if node.node().flag("autolink")
                    && Autolink::can_render(href)
                    && node.text_content() == href
                {
                    return format!("<{href}>");
                }
                let label = self.render_children(node, ctx);
                link_markdown(&label, href, node.attr("title"))
            }
            NodeKind::Image | NodeKind::Video => image_markdown(
                node.attr("alt").unwrap_or_default(),
                node.attr("src").unwrap_or_default(),
                node.attr("title"),
            ),
            NodeKind::Attachment => link_markdown(
                &escape_label(node.attr("name").unwrap_or_default()),
                node.attr("src").unwrap_or_default(),
                node.attr("title"),
            ),
            NodeKind::InlineMath if InlineMath::can_render(node.text()) => {
                format!("${}$", node.text())
            }
            NodeKind::InlineMath => {
                let warning = Warning::Unrepresentable {
                    node: node.id(),
                    message: format!("inline math {:?} would not read back", node.text()),
                };
                log::warn!("{warning}");
                self.warnings.push(warning);
                escape_all(&format!("${}$", node.text()))
            }
            NodeKind::FootnoteRef => FootnoteRef::render(node.attr("id").unwrap_or_default()),
            _ if !node.text().is_empty() => self.escape_text(node.text(), ctx),
            _ => self.render_children(node, ctx),
        }
    }

    fn escape_text(&self, text: &str, ctx: InlineCtx) -> String {
        if ctx.escape_everything || needs_escape(text, ctx.in_table) {
            escape_all(text)
        } else {
            text.to_string()
        }
    }
}

/// Appends `inner` wrapped in `delim`, keeping surrounding whitespace
/// outside the delimiters.
fn wrap(out: &mut String, inner: &str, delim: &str) {
    let core = inner.trim();
    if core.is_empty() {
        out.push_str(inner);
        return;
    }
    let lead = inner.len() - inner.trim_start().len();
    let trail_at = lead + core.len();
    out.push_str(&inner[..lead]);
    out.push_str(delim);
    out.push_str(core);
    out.push_str(delim);
    out.push_str(&inner[trail_at..]);
}

/// What a run of inline content reads back as.
#[derive(Debug, Clone, PartialEq)]
enum Sig {
    Text(String, Marks),
    Tag(PlaceholderTag, Marks),
    Link(String, Option<String>, Vec<Sig>),
    Image(String, String, Option<String>),
    Math(String),
    Ref(String),
}

/// Expected signature of tree nodes; `None` when some node's output cannot
/// be predicted (plugin kinds).
fn signature(nodes: &[NodeRef<'_>]) -> Option<Vec<Sig>> {
    let mut out = Vec::new();
    for node in nodes {
        let attr = |k: &str| node.attr(k).unwrap_or_default().to_string();
        match node.kind() {
            NodeKind::Text if node.marks().code => {
                out.push(Sig::Text(node.text().replace('\n', " "), node.marks()))
            }
            NodeKind::Text => out.push(Sig::Text(node.text().to_string(), node.marks())),
            NodeKind::PlaceholderTag => {
                let tag = node.tag()?;
                let rendered = PlaceholderSyntax::render(tag, node.text());
                for sig in sig_of_parsed(&parse_inline(0, &rendered)) {
                    out.push(add_marks(sig, node.marks()));
                }
            }
            NodeKind::Link => {
                let children: Vec<_> = node.children().collect();
                out.push(Sig::Link(
                    attr("href"),
                    node.attr("title").map(str::to_string),
                    merge(signature(&children)?),
                ));
            }
            NodeKind::Image | NodeKind::Video => out.push(Sig::Image(
                attr("src"),
                attr("alt"),
                node.attr("title").map(str::to_string),
            )),
            NodeKind::Attachment => out.push(Sig::Link(
                attr("src"),
                node.attr("title").map(str::to_string),
                merge(vec![Sig::Text(attr("name"), Marks::NONE)]),
            )),
            NodeKind::InlineMath if InlineMath::can_render(node.text()) => {
                out.push(Sig::Math(node.text().to_string()))
            }
            NodeKind::InlineMath => out.push(Sig::Text(format!("${}$", node.text()), Marks::NONE)),
            NodeKind::FootnoteRef => out.push(Sig::Ref(attr("id"))),
            _ => return None,
        }
    }
    Some(merge(out))
}

fn sig_of_parsed(nodes: &[InlineNode]) -> Vec<Sig> {
    nodes
        .iter()
        .map(|n| match n {
            InlineNode::Text { text, marks, .. } => Sig::Text(text.clone(), *marks),
            InlineNode::Tag { tag, marks, .. } => Sig::Tag(tag.clone(), *marks),
            InlineNode::Link {
                href,
                title,
                children,
                ..
            } => Sig::Link(href.clone(), title.clone(), merge(sig_of_parsed(children))),
            InlineNode::Image { src, alt, title, .. } => {
                Sig::Image(src.clone(), alt.clone(), title.clone())
            }
            InlineNode::InlineMath { tex, .. } => Sig::Math(tex.clone()),
            InlineNode::FootnoteRef { id, .. } => Sig::Ref(id.clone()),
        })
        .collect()
}

fn add_marks(sig: Sig, marks: Marks) -> Sig {
    let union = |m: Marks| Marks {
        bold: m.bold || marks.bold,
        italic: m.italic || marks.italic,
        strike: m.strike || marks.strike,
        code: m.code || marks.code,
    };
    match sig {
        Sig::Text(t, m) => Sig::Text(t, union(m)),
        Sig::Tag(t, m) => Sig::Tag(t, union(m)),
        other => other,
    }
}

/// Drops empty text and joins adjacent text with equal marks.
fn merge(sigs: Vec<Sig>) -> Vec<Sig> {
    let mut out: Vec<Sig> = Vec::with_capacity(sigs.len());
    for sig in sigs {
        if let Sig::Text(text, marks) = &sig {
            if text.is_empty() {
                continue;
            }
            if let Some(Sig::Text(last, last_marks)) = out.last_mut() {
                if last_marks == marks {
                    last.push_str(text);
                    continue;
                }
            }
        }
        out.push(sig);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_moves_outside_delimiters() {
        let mut out = String::new();
        wrap(&mut out, " bold ", "**");
        assert_eq!(out, " **bold** ");
        let mut out = String::new();
        wrap(&mut out, "  ", "*");
        assert_eq!(out, "  ");
    }

    #[test]
    fn merge_joins_equal_marks() {
        let merged = merge(vec![
            Sig::Text("a".into(), Marks::NONE),
            Sig::Text(String::new(), Marks::NONE),
            Sig::Text("b".into(), Marks::NONE),
            Sig::Math("x".into()),
        ]);
        assert_eq!(
            merged,
            vec![Sig::Text("ab".into(), Marks::NONE), Sig::Math("x".into())]
        );
    }
}
