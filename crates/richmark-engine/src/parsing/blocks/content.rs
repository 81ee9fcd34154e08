//! Content projection of source lines.
//!
//! Container prefixes (`> `, list indentation) are stripped before a nested
//! region is lexed again, so every line the lexer sees is a [`ContentLine`]:
//! the text left after its containers, plus where that text sits in the
//! source.

use crate::parsing::rope::{lines::LineRef, span::Span};

/// A single line's content within its enclosing containers.
///
/// # Invariants
///
/// - `content` lies within `raw_line`
/// - `text` is the source slice of `content`, minus the newline, with
///   leading tabs widened to four spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// 1-based source line number.
    pub number: usize,
    /// Full physical line span in the source.
    pub raw_line: Span,
    /// Remainder after stripping container prefixes.
    pub content: Span,
    pub text: String,
}

impl ContentLine {
    pub fn from_line_ref(lr: &LineRef) -> Self {
        let raw = lr.content();
        let body = raw.trim_start_matches([' ', '\t']);
        let lead = &raw[..raw.len() - body.len()];
        let text = if lead.contains('\t') {
            format!("{}{body}", lead.replace('\t', "    "))
        } else {
            raw.to_string()
        };
        Self {
            number: lr.number,
            raw_line: lr.span,
            content: Span::new(lr.span.start, lr.span.start + raw.len()),
            text,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Columns of leading spaces.
    pub fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    /// Drops the first `n` bytes of content (an ASCII prefix).
    #[must_use]
    pub fn strip(&self, n: usize) -> Self {
        let n = n.min(self.text.len());
        Self {
            number: self.number,
            raw_line: self.raw_line,
            content: Span::new((self.content.start + n).min(self.content.end), self.content.end),
            text: self.text[n..].to_string(),
        }
    }

    /// Drops up to `cols` leading spaces.
    #[must_use]
    pub fn strip_indent(&self, cols: usize) -> Self {
        self.strip(self.indent().min(cols))
    }
}

/// Joins line texts with `\n`.
pub fn join_text<'a>(lines: impl IntoIterator<Item = &'a ContentLine>) -> String {
    lines
        .into_iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Span covering the first through the last line.
pub fn lines_span(lines: &[ContentLine]) -> Span {
    match (lines.first(), lines.last()) {
        (Some(first), Some(last)) => Span::new(first.raw_line.start, last.raw_line.end),
        _ => Span::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(text: &str) -> ContentLine {
        ContentLine::from_line_ref(&LineRef {
            span: Span::new(10, 10 + text.len()),
            number: 3,
            text: text.to_string(),
        })
    }

    #[test]
    fn newline_is_not_content() {
        let l = line("> quote\n");
        assert_eq!(l.text, "> quote");
        assert_eq!(l.content, Span::new(10, 17));
    }

    #[test]
    fn leading_tabs_widen_to_four_spaces() {
        assert_eq!(line("\t- item").indent(), 4);
    }

    #[test]
    fn strip_advances_content_span() {
        let l = line("> quote").strip(2);
        assert_eq!(l.text, "quote");
        assert_eq!(l.content, Span::new(12, 17));
        assert_eq!(l.raw_line, Span::new(10, 17));
    }

    #[test]
    fn strip_indent_stops_at_text() {
        assert_eq!(line("  text").strip_indent(4).text, "text");
        assert_eq!(line("      text").strip_indent(4).text, "  text");
    }
}
