use std::collections::BTreeSet;

use xi_rope::Rope;

use crate::{
    parsing::rope::{lines_with_spans, preview},
    warning::Warning,
};

use super::{
    classify::{LineClass, MarkdownLineClassifier},
    content::{ContentLine, join_text, lines_span},
    kinds::{
        Alignment, BlockQuote, CodeFence, FenceOpen, FootnoteDef, FrontMatter, ListMarker, MathBlock,
        Paragraph, TableRow, TaskMarker,
    },
    types::{BlockEvent, BlockKind, BlockNode, ContainerFrame, ListInfo, TableBlock},
};

/// Containers nested deeper than this are lexed as plain text.
pub const MAX_NESTING: usize = 64;

/// Characters of source quoted in warning messages.
const PREVIEW_LEN: usize = 40;

#[derive(Debug, Default)]
pub struct LexOutput {
    pub events: Vec<BlockEvent>,
    pub warnings: Vec<Warning>,
}

/// Turns source lines into a flat [`BlockEvent`] stream.
///
/// Container regions (blockquotes, list items) are collected, stripped of
/// their prefixes and lexed again one level deeper.
pub struct BlockLexer<'a> {
    rope: &'a Rope,
    element_kinds: &'a BTreeSet<String>,
    classifier: MarkdownLineClassifier,
    out: LexOutput,
    nesting_warned: bool,
}

impl<'a> BlockLexer<'a> {
    pub fn new(rope: &'a Rope, element_kinds: &'a BTreeSet<String>) -> Self {
        Self {
            rope,
            element_kinds,
            classifier: MarkdownLineClassifier,
            out: LexOutput::default(),
            nesting_warned: false,
        }
    }

    pub fn lex(mut self) -> LexOutput {
        let lines: Vec<ContentLine> = lines_with_spans(self.rope)
            .map(|lr| ContentLine::from_line_ref(&lr))
            .collect();
        let start = self.front_matter(&lines);
        self.lex_lines(&lines[start..], 0);
        log::debug!(
            "lexed {} lines into {} block events",
            lines.len(),
            self.out.events.len()
        );
        self.out
    }

    /// Front-matter is only recognized on the first line of the document.
    fn front_matter(&mut self, lines: &[ContentLine]) -> usize {
        let Some(first) = lines.first() else {
            return 0;
        };
        if !FrontMatter::opens(&first.text) {
            return 0;
        }
        let Some(close) = lines.iter().skip(1).position(|l| FrontMatter::closes(&l.text)) else {
            return 0;
        };
        let close = close + 1;
        let raw = join_text(&lines[1..close]);
        self.leaf(BlockKind::FrontMatter { raw }, &lines[..=close]);
        close + 1
    }

    fn lex_lines(&mut self, lines: &[ContentLine], depth: usize) {
        let mut para: Vec<ContentLine> = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = &lines[i];
            let mut class = self.classifier.classify(&line.text);
            if depth >= MAX_NESTING && matches!(class, LineClass::Quote | LineClass::ListItem(_)) {
                self.warn_nesting(line);
                class = self.classifier.classify_flat(&line.text);
            }

            match class {
                LineClass::Blank => {
                    self.flush_paragraph(&mut para);
                    i += 1;
                }
                LineClass::Fence(open) => {
                    self.flush_paragraph(&mut para);
                    i = self.fence(lines, i, &open);
                }
                LineClass::MathFence => {
                    self.flush_paragraph(&mut para);
                    i = self.math(lines, i);
                }
                LineClass::MathLine(body) => {
                    self.flush_paragraph(&mut para);
                    self.leaf(
                        BlockKind::MathBlock {
                            body,
                            terminated: true,
                        },
                        &lines[i..=i],
                    );
                    i += 1;
                }
                LineClass::Heading { level, content } => {
                    self.flush_paragraph(&mut para);
                    self.leaf(BlockKind::Heading { level, content }, &lines[i..=i]);
                    i += 1;
                }
                LineClass::ThematicBreak => {
                    self.flush_paragraph(&mut para);
                    self.leaf(BlockKind::ThematicBreak, &lines[i..=i]);
                    i += 1;
                }
                LineClass::Quote => {
                    self.flush_paragraph(&mut para);
                    i = self.quote(lines, i, depth);
                }
                LineClass::ListItem(marker) => {
                    if !para.is_empty() && !marker.can_interrupt_paragraph() {
                        para.push(line.clone());
                        i += 1;
                        continue;
                    }
                    self.flush_paragraph(&mut para);
                    i = self.list(lines, i, marker, depth);
                }
                LineClass::FootnoteDef { id, body_offset } => {
                    self.flush_paragraph(&mut para);
                    i = self.footnote_def(lines, i, id, body_offset);
                }
                LineClass::Text => {
                    let separator = lines
                        .get(i + 1)
                        .filter(|_| TableRow::looks_like_row(&line.text))
                        .and_then(|next| TableRow::separator(&next.text));
                    match separator {
                        Some(alignments) => {
                            let header = TableRow::split(&line.text);
                            if header.len() == alignments.len() {
                                self.flush_paragraph(&mut para);
                                i = self.table(lines, i, header, alignments);
                            } else {
                                self.warn(
                                    line,
                                    format!(
                                        "table header has {} columns but its separator has {}; kept as a paragraph",
                                        header.len(),
                                        alignments.len()
                                    ),
                                );
                                para.extend_from_slice(&lines[i..i + 2]);
                                i += 2;
                            }
                        }
                        None => {
                            para.push(line.clone());
                            i += 1;
                        }
                    }
                }
            }
        }

        self.flush_paragraph(&mut para);
    }

    fn fence(&mut self, lines: &[ContentLine], i: usize, open: &FenceOpen) -> usize {
        let close = lines[i + 1..]
            .iter()
            .position(|l| CodeFence::closes(open, &l.text))
            .map(|p| i + 1 + p);
        let body_end = close.unwrap_or(lines.len());
        let mut body: Vec<ContentLine> = lines[i + 1..body_end]
            .iter()
            .map(|l| l.strip_indent(open.indent))
            .collect();

        if close.is_none() {
            while body.last().is_some_and(ContentLine::is_blank) {
                body.pop();
            }
            let shown = preview(self.rope, lines[i].raw_line, PREVIEW_LEN);
            self.warn(
                &lines[i],
                format!("unterminated code fence `{shown}`; the rest of the block is treated as code"),
            );
        }

        let element = (!open.language.is_empty() && self.element_kinds.contains(&open.language))
            .then(|| open.language.clone());
        let last = close.unwrap_or(lines.len() - 1);
        self.leaf(
            BlockKind::FencedCode {
                kind: open.kind,
                language: open.language.clone(),
                meta: open.meta.clone(),
                body: join_text(&body),
                element,
                terminated: close.is_some(),
            },
            &lines[i..=last],
        );
        last + 1
    }

    fn math(&mut self, lines: &[ContentLine], i: usize) -> usize {
        let close = lines[i + 1..]
            .iter()
            .position(|l| MathBlock::closes(&l.text))
            .map(|p| i + 1 + p);
        let mut body: Vec<&ContentLine> = lines[i + 1..close.unwrap_or(lines.len())].iter().collect();
        if close.is_none() {
            while body.last().is_some_and(|l| l.is_blank()) {
                body.pop();
            }
            self.warn(
                &lines[i],
                "unterminated math block; the rest of the block is treated as math".to_string(),
            );
        }
        let last = close.unwrap_or(lines.len() - 1);
        self.leaf(
            BlockKind::MathBlock {
                body: join_text(body),
                terminated: close.is_some(),
            },
            &lines[i..=last],
        );
        last + 1
    }

    fn quote(&mut self, lines: &[ContentLine], i: usize, depth: usize) -> usize {
        let mut inner = Vec::new();
        let mut j = i;
        while let Some(offset) = lines.get(j).and_then(|l| BlockQuote::strip_one(&l.text)) {
            inner.push(lines[j].strip(offset));
            j += 1;
        }
        self.out.events.push(BlockEvent::Open {
            frame: ContainerFrame::BlockQuote,
            span: lines_span(&lines[i..j]),
        });
        self.lex_lines(&inner, depth + 1);
        self.out.events.push(BlockEvent::Close);
        j
    }

    fn list(&mut self, lines: &[ContentLine], i: usize, first: ListMarker, depth: usize) -> usize {
        let mut items: Vec<(Option<bool>, Vec<ContentLine>, usize, usize)> = Vec::new();
        let mut loose = false;
        let mut j = i;
        let mut marker = first;

        loop {
            let start = j;
            let (content, end) = self.item_lines(lines, j, &marker);
            let (checked, content) = split_task(content);
            if has_blank_between_children(&content) {
                loose = true;
            }
            items.push((checked, content, start, end));
            j = end;

            let next = (j..lines.len()).find(|&k| !lines[k].is_blank());
            let sibling = next.and_then(|k| match self.classifier.classify(&lines[k].text) {
                LineClass::ListItem(m) if m.same_list(&first) => Some((k, m)),
                _ => None,
            });
            match sibling {
                Some((k, m)) => {
                    if k > j {
                        loose = true;
                    }
                    j = k;
                    marker = m;
                }
                None => break,
            }
        }

        let info = ListInfo {
            ordered: first.ordered,
            symbol: first.symbol,
            start: first.number,
            tight: !loose,
        };
        self.out.events.push(BlockEvent::Open {
            frame: ContainerFrame::List(info),
            span: lines_span(&lines[i..j]),
        });
        for (checked, content, start, end) in items {
            self.out.events.push(BlockEvent::Open {
                frame: ContainerFrame::ListItem { checked },
                span: lines_span(&lines[start..end]),
            });
            self.lex_lines(&content, depth + 1);
            self.out.events.push(BlockEvent::Close);
        }
        self.out.events.push(BlockEvent::Close);
        j
    }

    /// Collects the content lines of the item starting at `start`, stripped
    /// to the item's content column. Returns them with the index just past
    /// the item.
    fn item_lines(
        &self,
        lines: &[ContentLine],
        start: usize,
        marker: &ListMarker,
    ) -> (Vec<ContentLine>, usize) {
        let col = marker.content_offset;
        let mut content = vec![lines[start].strip(col)];
        let mut j = start + 1;

        while j < lines.len() {
            let line = &lines[j];
            if line.is_blank() {
                let next = (j..lines.len()).find(|&k| !lines[k].is_blank());
                match next {
                    Some(n) if lines[n].indent() >= col => {
                        content.extend(lines[j..n].iter().map(|l| l.strip_indent(col)));
                        j = n;
                        continue;
                    }
                    _ => break,
                }
            }
            if line.indent() >= col {
                content.push(line.strip_indent(col));
                j += 1;
                continue;
            }
            // Lazy continuation: unindented text carrying on a paragraph.
            let continues_text = content.last().is_some_and(|last| {
                !last.is_blank() && self.classifier.classify(&last.text) == LineClass::Text
            });
            if continues_text && self.classifier.classify(&line.text) == LineClass::Text {
                content.push(line.strip_indent(line.indent()));
                j += 1;
                continue;
            }
            break;
        }

        while content.last().is_some_and(ContentLine::is_blank) {
            content.pop();
        }
        (content, j)
    }

    fn footnote_def(&mut self, lines: &[ContentLine], i: usize, id: String, body_offset: usize) -> usize {
        let mut body = vec![lines[i].text[body_offset..].trim_end().to_string()];
        let mut j = i + 1;
        while let Some(line) = lines.get(j) {
            if line.is_blank() || line.indent() < FootnoteDef::CONTINUATION_INDENT {
                break;
            }
            body.push(line.text.trim().to_string());
            j += 1;
        }
        self.leaf(
            BlockKind::FootnoteDef {
                id,
                body: body.join("\n"),
            },
            &lines[i..j],
        );
        j
    }

    fn table(
        &mut self,
        lines: &[ContentLine],
        i: usize,
        header: Vec<String>,
        alignments: Vec<Alignment>,
    ) -> usize {
        let width = header.len();
        let mut rows = Vec::new();
        let mut j = i + 2;
        while let Some(line) = lines.get(j) {
            if self.classifier.classify(&line.text) != LineClass::Text {
                break;
            }
            let mut cells = TableRow::split(&line.text);
            cells.resize(width, String::new());
            rows.push(cells);
            j += 1;
        }
        self.leaf(
            BlockKind::Table(TableBlock {
                alignments,
                header,
                rows,
            }),
            &lines[i..j],
        );
        j
    }

    fn flush_paragraph(&mut self, para: &mut Vec<ContentLine>) {
        if para.is_empty() {
            return;
        }
        let content = Paragraph::content(para.iter().map(|l| l.text.as_str()));
        let lines = std::mem::take(para);
        self.leaf(BlockKind::Paragraph { content }, &lines);
    }

    fn leaf(&mut self, kind: BlockKind, lines: &[ContentLine]) {
        let line = lines.first().map_or(0, |l| l.number);
        self.out.events.push(BlockEvent::Leaf(BlockNode {
            kind,
            span: lines_span(lines),
            line,
        }));
    }

    fn warn(&mut self, line: &ContentLine, message: String) {
        let warning = Warning::RecoverableParse {
            line: line.number,
            span: line.raw_line,
            message,
        };
        log::warn!("{warning}");
        self.out.warnings.push(warning);
    }

    fn warn_nesting(&mut self, line: &ContentLine) {
        if self.nesting_warned {
            return;
        }
        self.nesting_warned = true;
        self.warn(
            line,
            format!("containers nested deeper than {MAX_NESTING} levels are kept as text"),
        );
    }
}

/// Pulls a `[ ]` / `[x]` prefix off the first content line.
fn split_task(mut content: Vec<ContentLine>) -> (Option<bool>, Vec<ContentLine>) {
    let task = content.first().and_then(|first| TaskMarker::parse(&first.text));
    match task {
        Some((checked, offset)) => {
            content[0] = content[0].strip(offset);
            (Some(checked), content)
        }
        None => (None, content),
    }
}

/// A blank line followed by a block at the item's own content column
/// separates two children of the item.
fn has_blank_between_children(content: &[ContentLine]) -> bool {
    content.windows(2).any(|w| w[0].is_blank() && !w[1].is_blank() && w[1].indent() == 0)
}

/// Lexes a whole document.
pub fn lex(rope: &Rope, element_kinds: &BTreeSet<String>) -> LexOutput {
    BlockLexer::new(rope, element_kinds).lex()
}
