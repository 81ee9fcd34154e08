use std::collections::HashSet;

use crate::{parsing::rope::span::Span, tree::Marks};

use super::{
    cursor::Cursor,
    kinds::{
        Autolink, CodeSpan, Delim, Emphasis, Escape, FootnoteRef, InlineMath, Link, LinkIndex,
        PlaceholderSyntax,
    },
    types::InlineNode,
};

/// Parses inline content into a sequence of [`InlineNode`]s.
///
/// # Arguments
/// - `base`: Byte offset where `s` begins (for absolute span positions)
/// - `s`: The inline content of one block
///
/// # Precedence
/// Escapes and code spans are checked first; code spans are raw zones, so
/// `` `**x**` `` is code, never bold. Then autolinks, images, footnote
/// references, links and inline math. Emphasis delimiters are tried last
/// and fall back to literal text when no matching closer exists.
pub fn parse_inline(base: usize, s: &str) -> Vec<InlineNode> {
    InlineParser::new(s, base, false).parse_all(Marks::NONE)
}

/// Accumulates text for one run of identical marks.
struct Seq {
    marks: Marks,
    nodes: Vec<InlineNode>,
    buf: String,
    start: usize,
    end: usize,
}

impl Seq {
    fn new(marks: Marks) -> Self {
        Self {
            marks,
            nodes: vec![],
            buf: String::new(),
            start: 0,
            end: 0,
        }
    }

    fn push_str(&mut self, span: Span, text: &str) {
        if self.buf.is_empty() {
            self.start = span.start;
        }
        self.buf.push_str(text);
        self.end = span.end;
    }

    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let node = InlineNode::Text {
            span: Span::new(self.start, self.end),
            text: std::mem::take(&mut self.buf),
            marks: self.marks,
        };
        self.push_merged(node);
    }

    fn push(&mut self, node: InlineNode) {
        self.flush();
        self.push_merged(node);
    }

    /// Adjacent text with the same marks becomes one node.
    fn push_merged(&mut self, node: InlineNode) {
        if let (
            Some(InlineNode::Text {
                span: last_span,
                text: last_text,
                marks: last_marks,
            }),
            InlineNode::Text { span, text, marks },
        ) = (self.nodes.last_mut(), &node)
        {
            if last_marks == marks && last_span.end == span.start {
                last_text.push_str(text);
                *last_span = last_span.cover(*span);
                return;
            }
        }
        self.nodes.push(node);
    }

    fn finish(mut self) -> Vec<InlineNode> {
        self.flush();
        self.nodes
    }
}

struct InlineParser<'a> {
    cur: Cursor<'a>,
    in_link: bool,
    /// Emphasis attempts already known to find no closer.
    failed: HashSet<(usize, Delim, Marks)>,
    /// Built on the first `[`.
    links: Option<LinkIndex<'a>>,
    /// No `$` before this local offset opens inline math.
    math_dead_end: usize,
}

impl<'a> InlineParser<'a> {
    fn new(s: &'a str, base: usize, in_link: bool) -> Self {
        Self {
            cur: Cursor::new(s, base),
            in_link,
            failed: HashSet::new(),
            links: None,
            math_dead_end: 0,
        }
    }

    fn parse_all(&mut self, marks: Marks) -> Vec<InlineNode> {
        self.parse_seq(marks, None).unwrap_or_default()
    }

    /// Parses until `closer` (or end of input when there is none). Returns
    /// `None` when a closer was required and never found.
    fn parse_seq(&mut self, marks: Marks, closer: Option<Delim>) -> Option<Vec<InlineNode>> {
        let mut seq = Seq::new(marks);
        while let Some(b) = self.cur.peek() {
            if let Some(d) = closer {
                if Emphasis::closes(&self.cur, d) {
                    self.cur.bump_n(d.len());
                    return Some(seq.finish());
                }
            }
            if let Some(c) = Escape::parse(self.cur.rest()) {
                let start = self.cur.pos();
                self.cur.bump_n(2);
                let mut tmp = [0u8; 4];
                seq.push_str(Span::new(start, self.cur.pos()), c.encode_utf8(&mut tmp));
                continue;
            }
            if let Some(node) = self.try_parse_construct(b, marks) {
                seq.push(node);
                continue;
            }
            if Emphasis::is_delim_byte(b) || b == CodeSpan::TICK {
                if let Some(inner) = self.try_parse_emphasis(marks) {
                    seq.flush();
                    for node in inner {
                        seq.push_merged(node);
                    }
                    continue;
                }
                // An unmatched run is literal as a whole, so a shorter run
                // inside it cannot open.
                let start = self.cur.pos();
                let run = self.cur.run_len(b);
                let text = &self.cur.rest()[..run];
                seq.push_str(Span::new(start, start + run), text);
                self.cur.bump_n(run);
                continue;
            }
            let start = self.cur.pos();
            if let Some(c) = self.cur.bump_char() {
                let mut tmp = [0u8; 4];
                seq.push_str(Span::new(start, self.cur.pos()), c.encode_utf8(&mut tmp));
            }
        }
        closer.is_none().then(|| seq.finish())
    }

    fn try_parse_construct(&mut self, b: u8, marks: Marks) -> Option<InlineNode> {
        match b {
            CodeSpan::TICK => try_parse_code_span(&mut self.cur, marks),
            Autolink::OPEN => try_parse_autolink(&mut self.cur, marks),
            b'!' if self.cur.starts_with(Link::IMAGE) => {
                let links = self.links.get_or_insert_with(|| LinkIndex::new(self.cur.s));
                try_parse_image(&mut self.cur, links)
            }
            Link::OPEN => try_parse_footnote_ref(&mut self.cur).or_else(|| {
                if self.in_link {
                    return None;
                }
                let links = self.links.get_or_insert_with(|| LinkIndex::new(self.cur.s));
                try_parse_link(&mut self.cur, links, marks)
            }),
            InlineMath::DELIM if self.cur.i >= self.math_dead_end => self.try_parse_inline_math(),
            _ => None,
        }
    }

    fn try_parse_inline_math(&mut self) -> Option<InlineNode> {
        let start = self.cur.pos();
        match InlineMath::scan(self.cur.rest()) {
            Ok((tex, len)) => {
                let tex = tex.to_string();
                self.cur.bump_n(len);
                Some(InlineNode::InlineMath {
                    span: Span::new(start, self.cur.pos()),
                    tex,
                })
            }
            Err(reach) => {
                self.math_dead_end = self.cur.i + reach;
                None
            }
        }
    }

    fn try_parse_emphasis(&mut self, marks: Marks) -> Option<Vec<InlineNode>> {
        let pos = self.cur.pos();
        for d in Emphasis::openers(&self.cur) {
            if marks.has(d.mark()) || self.failed.contains(&(pos, d, marks)) {
                continue;
            }
            let saved = self.cur.clone();
            self.cur.bump_n(d.len());
            match self.parse_seq(marks.with(d.mark()), Some(d)) {
                Some(inner) if !inner.is_empty() => return Some(inner),
                _ => {
                    self.cur = saved;
                    self.failed.insert((pos, d, marks));
                }
            }
        }
        None
    }
}

fn try_parse_code_span(cur: &mut Cursor<'_>, marks: Marks) -> Option<InlineNode> {
    let start = cur.pos();
    let run = cur.run_len(CodeSpan::TICK);
    let after = &cur.rest()[run..];
    let close = CodeSpan::find_close(after, run)?;
    let raw = after[..close].replace('\n', " ");
    let content = CodeSpan::trim_content(&raw);
    cur.bump_n(run + close + run);
    let span = Span::new(start, cur.pos());
    if run == 1 {
        if let Some(tag) = PlaceholderSyntax::parse(content) {
            return Some(InlineNode::Tag { span, tag, marks });
        }
    }
    Some(InlineNode::Text {
        span,
        text: content.to_string(),
        marks: marks.with(crate::tree::Mark::Code),
    })
}

fn try_parse_autolink(cur: &mut Cursor<'_>, marks: Marks) -> Option<InlineNode> {
    let start = cur.pos();
    let (href, len) = Autolink::parse(cur.rest())?;
    let href = href.to_string();
    cur.bump_n(len);
    let span = Span::new(start, cur.pos());
    Some(InlineNode::Link {
        span,
        title: None,
        autolink: true,
        children: vec![InlineNode::Text {
            span: Span::new(start + 1, span.end - 1),
            text: href.clone(),
            marks,
        }],
        href,
    })
}

fn try_parse_image(cur: &mut Cursor<'_>, links: &LinkIndex<'_>) -> Option<InlineNode> {
    let start = cur.pos();
    let label = &cur.rest()[1..];
    let close = links.label_end(cur.i + 1)?;
    if !links.destination_may_close(close + 1) {
        return None;
    }
    let end = close - (cur.i + 1);
    let dest = Link::parse_destination(&label[end + 1..])?;
    let alt = unescape(&label[1..end]);
    cur.bump_n(1 + end + 1 + dest.len);
    Some(InlineNode::Image {
        span: Span::new(start, cur.pos()),
        src: dest.href,
        alt,
        title: dest.title,
    })
}

fn try_parse_footnote_ref(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if !cur.starts_with(FootnoteRef::OPEN) {
        return None;
    }
    let start = cur.pos();
    let (id, len) = FootnoteRef::parse(cur.rest())?;
    let id = id.to_string();
    cur.bump_n(len);
    Some(InlineNode::FootnoteRef {
        span: Span::new(start, cur.pos()),
        id,
    })
}

fn try_parse_link(cur: &mut Cursor<'_>, links: &LinkIndex<'_>, marks: Marks) -> Option<InlineNode> {
    let start = cur.pos();
    let rest = cur.rest();
    let close = links.label_end(cur.i)?;
    if !links.destination_may_close(close + 1) {
        return None;
    }
    let end = close - cur.i;
    let dest = Link::parse_destination(&rest[end + 1..])?;
    let children = InlineParser::new(&rest[1..end], start + 1, true).parse_all(marks);
    cur.bump_n(end + 1 + dest.len);
    Some(InlineNode::Link {
        span: Span::new(start, cur.pos()),
        href: dest.href,
        title: dest.title,
        autolink: false,
        children,
    })
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        if let Some(e) = Escape::parse(rest) {
            out.push(e);
            rest = &rest[2..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}

/// Concatenated plain text of inline nodes, ignoring formatting.
pub fn plain_text(nodes: &[InlineNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            InlineNode::Text { text, .. } => out.push_str(text),
            InlineNode::Tag { tag, .. } => out.push_str(&tag.placeholder),
            InlineNode::Link { children, .. } => out.push_str(&plain_text(children)),
            InlineNode::Image { alt, .. } => out.push_str(alt),
            InlineNode::InlineMath { tex, .. } => out.push_str(tex),
            InlineNode::FootnoteRef { id, .. } => out.push_str(&FootnoteRef::render(id)),
        }
    }
    out
}
