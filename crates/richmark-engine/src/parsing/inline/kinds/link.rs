use std::collections::HashMap;

use super::{code_span::CodeSpan, escape::Escape};

/// A parsed `(destination "title")` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub href: String,
    pub title: Option<String>,
    /// Bytes consumed, including both parentheses.
    pub len: usize,
}

/// Links `[text](href "title")` and images `![alt](src "title")`.
pub struct Link;

impl Link {
    pub const OPEN: u8 = b'[';
    pub const CLOSE: u8 = b']';
    pub const IMAGE: &'static [u8; 2] = b"![";
    pub const DEST_OPEN: u8 = b'(';
    pub const DEST_CLOSE: u8 = b')';

    /// Offset of the `]` matching the `[` at the start of `s`. Escapes and
    /// code spans are skipped; brackets nest.
    pub fn find_label_end(s: &str) -> Option<usize> {
        let b = s.as_bytes();
        if b.first() != Some(&Self::OPEN) {
            return None;
        }
        let mut depth = 0usize;
        let mut i = 0;
        while i < b.len() {
            match b[i] {
                Escape::BACKSLASH => i += 2,
                CodeSpan::TICK => i = skip_code_span(s, i),
                Self::OPEN => {
                    depth += 1;
                    i += 1;
                }
                Self::CLOSE => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// Parses the destination part starting at `(`.
    pub fn parse_destination(s: &str) -> Option<Destination> {
        let rest = s.strip_prefix(Self::DEST_OPEN as char)?;
        let mut i = skip_spaces(rest, 0);

        let (href, after) = if rest[i..].starts_with('<') {
            let end = rest[i + 1..].find(['>', '\n'])?;
            if rest.as_bytes()[i + 1 + end] != b'>' {
                return None;
            }
            (rest[i + 1..i + 1 + end].to_string(), i + end + 2)
        } else {
            let mut href = String::new();
            let mut depth = 0usize;
            let mut chars = rest[i..].char_indices();
            let mut end = rest.len();
            while let Some((at, c)) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some((_, e)) if e.is_ascii_punctuation() => href.push(e),
                        Some((_, e)) => {
                            href.push('\\');
                            href.push(e);
                        }
                        None => href.push('\\'),
                    },
                    '(' => {
                        depth += 1;
                        href.push(c);
                    }
                    ')' if depth == 0 => {
                        end = i + at;
                        break;
                    }
                    ')' => {
                        depth -= 1;
                        href.push(c);
                    }
                    c if c.is_whitespace() => {
                        end = i + at;
                        break;
                    }
                    c => href.push(c),
                }
            }
            (href, end)
        };

        i = skip_spaces(rest, after);
        let mut title = None;
        if let Some(q) = rest[i..].chars().next().filter(|c| *c == '"' || *c == '\'') {
            let mut t = String::new();
            let mut chars = rest[i + 1..].char_indices();
            let mut closed = None;
            while let Some((at, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, e)) = chars.next() {
                            t.push(e);
                        }
                    }
                    c if c == q => {
                        closed = Some(i + 1 + at + 1);
                        break;
                    }
                    c => t.push(c),
                }
            }
            i = skip_spaces(rest, closed?);
            title = Some(t);
        }

        if !rest[i..].starts_with(Self::DEST_CLOSE as char) {
            return None;
        }
        Some(Destination {
            href,
            title,
            len: 1 + i + 1,
        })
    }

    /// Renders `(href "title")`.
    pub fn render_destination(href: &str, title: Option<&str>) -> String {
        let href = if href.is_empty() || href.contains(char::is_whitespace) {
            format!("<{href}>")
        } else {
            href.replace('\\', "\\\\")
                .replace('(', "\\(")
                .replace(')', "\\)")
        };
        match title {
            Some(t) => format!(
                "({href} \"{}\")",
                t.replace('\\', "\\\\").replace('"', "\\\"")
            ),
            None => format!("({href})"),
        }
    }
}

/// Index after the tick run at `i` and, when it closes, its code span.
fn skip_code_span(s: &str, i: usize) -> usize {
    let run = s.as_bytes()[i..]
        .iter()
        .take_while(|&&c| c == CodeSpan::TICK)
        .count();
    let after = i + run;
    match CodeSpan::find_close(&s[after..], run) {
        Some(close) => after + close + run,
        None => after,
    }
}

/// Where link scans over one inline run end, computed in one pass each so a
/// failed `[` or `(` costs constant time instead of a rescan to the end.
pub struct LinkIndex<'a> {
    s: &'a str,
    /// Matching `]` for every `[` the label scan visits; `None` when unclosed.
    label_end: HashMap<usize, Option<usize>>,
    /// Where an unbracketed destination starting at each offset stops: at
    /// whitespace, an unmatched `)`, or the end of input.
    href_end: Vec<usize>,
    /// Next `>` or newline at or after each offset.
    angle_end: Vec<usize>,
}

impl<'a> LinkIndex<'a> {
    pub fn new(s: &'a str) -> Self {
        let b = s.as_bytes();
        let n = b.len();

        let mut label_end = HashMap::new();
        let mut open = Vec::new();
        let mut i = 0;
        while i < n {
            match b[i] {
                Escape::BACKSLASH => i += 2,
                CodeSpan::TICK => i = skip_code_span(s, i),
                Link::OPEN => {
                    open.push(i);
                    label_end.insert(i, None);
                    i += 1;
                }
                Link::CLOSE => {
                    if let Some(start) = open.pop() {
                        label_end.insert(start, Some(i));
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }

        let mut href_end = vec![n; n + 1];
        let mut angle_end = vec![n; n + 1];
        for i in (0..n).rev() {
            angle_end[i] = if matches!(b[i], b'>' | b'\n') { i } else { angle_end[i + 1] };
            let Some(c) = s.get(i..).and_then(|r| r.chars().next()) else {
                continue;
            };
            let next = i + c.len_utf8();
            href_end[i] = match c {
                '\\' => match s[next..].chars().next() {
                    Some(e) => href_end[next + e.len_utf8()],
                    None => n,
                },
                ')' => i,
                '(' => {
                    let close = href_end[next];
                    if close < n && b[close] == Link::DEST_CLOSE {
                        href_end[close + 1]
                    } else {
                        close
                    }
                }
                c if c.is_whitespace() => i,
                _ => href_end[next],
            };
        }

        Self {
            s,
            label_end,
            href_end,
            angle_end,
        }
    }

    /// Offset of the `]` closing the `[` at `open`.
    pub fn label_end(&self, open: usize) -> Option<usize> {
        match self.label_end.get(&open) {
            Some(end) => *end,
            // Inside a span the label scan skipped; scan directly.
            None => Link::find_label_end(self.s.get(open..)?).map(|end| open + end),
        }
    }

    /// False when [`Link::parse_destination`] at `open` is bound to fail.
    /// Titles are left to the full parse.
    pub fn destination_may_close(&self, open: usize) -> bool {
        let b = self.s.as_bytes();
        if b.get(open) != Some(&Link::DEST_OPEN) {
            return false;
        }
        let start = skip_spaces(self.s, open + 1);
        let after = if b.get(start) == Some(&b'<') {
            let end = self.angle_end[start + 1];
            if b.get(end) != Some(&b'>') {
                return false;
            }
            end + 1
        } else {
            self.href_end[start]
        };
        let at = skip_spaces(self.s, after);
        matches!(b.get(at), Some(&(Link::DEST_CLOSE | b'"' | b'\'')))
    }
}

fn skip_spaces(s: &str, from: usize) -> usize {
    from + s[from..].len() - s[from..].trim_start_matches([' ', '\t', '\n']).len()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn label_end_nests_and_skips_code() {
        assert_eq!(Link::find_label_end("[a [b] c](x)"), Some(8));
        assert_eq!(Link::find_label_end("[a `]` b]"), Some(8));
        assert_eq!(Link::find_label_end(r"[a \] b]"), Some(7));
        assert_eq!(Link::find_label_end("[open"), None);
    }

    #[test]
    fn index_agrees_with_direct_scans() {
        let s = "[a [b] c](x) [open `]` (y [c](d e) [f](<g h>) [i](<j";
        let index = LinkIndex::new(s);
        for (at, _) in s.match_indices('[') {
            assert_eq!(index.label_end(at), Link::find_label_end(&s[at..]).map(|e| at + e), "at {at}");
        }
        for (at, _) in s.match_indices('(') {
            if !index.destination_may_close(at) {
                assert_eq!(Link::parse_destination(&s[at..]), None, "at {at}");
            }
        }
        assert!(index.destination_may_close(9));
        assert!(!index.destination_may_close(s.rfind('(').unwrap()));
    }

    #[test]
    fn destination_with_title() {
        assert_eq!(
            Link::parse_destination(r#"(https://a.b/c "T \"q\"") tail"#),
            Some(Destination {
                href: "https://a.b/c".into(),
                title: Some("T \"q\"".into()),
                len: 25,
            })
        );
    }

    #[test]
    fn destination_variants() {
        let d = Link::parse_destination("(<with space.pdf>)").unwrap();
        assert_eq!(d.href, "with space.pdf");
        assert_eq!(d.len, 18);

        let d = Link::parse_destination("(a(b)c)").unwrap();
        assert_eq!(d.href, "a(b)c");

        let d = Link::parse_destination("()").unwrap();
        assert_eq!(d.href, "");
        assert_eq!(d.len, 2);

        assert_eq!(Link::parse_destination("(a b c)"), None);
        assert_eq!(Link::parse_destination("(unclosed"), None);
    }

    #[test]
    fn rendering_survives_reparse() {
        for (href, title) in [("a b.pdf", None), ("x(1)", Some("say \"hi\"")), ("", None)] {
            let rendered = Link::render_destination(href, title);
            let parsed = Link::parse_destination(&rendered).unwrap();
            assert_eq!(parsed.href, href);
            assert_eq!(parsed.title.as_deref(), title);
            assert_eq!(parsed.len, rendered.len());
        }
    }
}
