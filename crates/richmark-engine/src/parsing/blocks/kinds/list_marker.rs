/// A list item marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMarker {
    pub ordered: bool,
    /// Bullet character (`-`, `*`, `+`) or ordered delimiter (`.`, `)`).
    pub symbol: char,
    /// Ordinal of an ordered marker; 1 for bullets.
    pub number: u64,
    /// Spaces before the marker.
    pub indent: usize,
    /// Column where item content starts, relative to the line.
    pub content_offset: usize,
    /// Nothing follows the marker on this line.
    pub empty: bool,
}

impl ListMarker {
    pub const BULLETS: [char; 3] = ['-', '*', '+'];
    pub const DELIMITERS: [char; 2] = ['.', ')'];
    /// Ordered markers longer than this are plain text.
    pub const MAX_DIGITS: usize = 9;

    pub fn parse(line: &str) -> Option<ListMarker> {
        let t = line.trim_start_matches(' ');
        let indent = line.len() - t.len();
        if indent > 3 {
            return None;
        }
        let first = t.chars().next()?;
        let (ordered, symbol, number, marker_len) = if Self::BULLETS.contains(&first) {
            (false, first, 1, 1)
        } else {
            let digits = t.len() - t.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            if digits == 0 || digits > Self::MAX_DIGITS {
                return None;
            }
            let delim = t[digits..].chars().next()?;
            if !Self::DELIMITERS.contains(&delim) {
                return None;
            }
            let number = t[..digits].parse().ok()?;
            (true, delim, number, digits + 1)
        };

        let after = &t[marker_len..];
        if after.trim().is_empty() {
            return Some(ListMarker {
                ordered,
                symbol,
                number,
                indent,
                content_offset: indent + marker_len + 1,
                empty: true,
            });
        }
        let spaces = after.len() - after.trim_start_matches(' ').len();
        if spaces == 0 {
            return None;
        }
        // Five or more spaces mean indented content: the marker owns just one.
        let spaces = if spaces > 4 { 1 } else { spaces };
        Some(ListMarker {
            ordered,
            symbol,
            number,
            indent,
            content_offset: indent + marker_len + spaces,
            empty: false,
        })
    }

    /// Whether another marker continues the same list.
    pub fn same_list(&self, other: &ListMarker) -> bool {
        self.ordered == other.ordered && self.symbol == other.symbol
    }

    /// Only non-empty bullets and ordered lists starting at 1 may interrupt a
    /// paragraph.
    pub fn can_interrupt_paragraph(&self) -> bool {
        !self.empty && (!self.ordered || self.number == 1)
    }
}

/// `[ ]` / `[x]` prefix of a task list item.
pub struct TaskMarker;

impl TaskMarker {
    /// Returns the checked state and the byte offset where item text begins.
    pub fn parse(content: &str) -> Option<(bool, usize)> {
        let checked = match content.get(..3)? {
            "[ ]" => false,
            "[x]" | "[X]" => true,
            _ => return None,
        };
        let rest = &content[3..];
        if rest.is_empty() {
            return Some((checked, 3));
        }
        rest.starts_with(' ').then_some((checked, 4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_marker() {
        let m = ListMarker::parse("- item").unwrap();
        assert!(!m.ordered);
        assert_eq!(m.symbol, '-');
        assert_eq!(m.content_offset, 2);
    }

    #[test]
    fn ordered_marker_keeps_number_and_delimiter() {
        let m = ListMarker::parse("  12) twelve").unwrap();
        assert!(m.ordered);
        assert_eq!((m.number, m.symbol, m.indent), (12, ')', 2));
        assert_eq!(m.content_offset, 6);
    }

    #[test]
    fn marker_requires_space() {
        assert_eq!(ListMarker::parse("-item"), None);
        assert_eq!(ListMarker::parse("1.5 apples"), None);
    }

    #[test]
    fn empty_item() {
        let m = ListMarker::parse("*").unwrap();
        assert!(m.empty);
        assert!(!m.can_interrupt_paragraph());
    }

    #[test]
    fn only_first_ordinal_interrupts() {
        assert!(ListMarker::parse("1. a").unwrap().can_interrupt_paragraph());
        assert!(!ListMarker::parse("2. a").unwrap().can_interrupt_paragraph());
    }

    #[test]
    fn task_markers() {
        assert_eq!(TaskMarker::parse("[ ] todo"), Some((false, 4)));
        assert_eq!(TaskMarker::parse("[X] done"), Some((true, 4)));
        assert_eq!(TaskMarker::parse("[x]"), Some((true, 3)));
        assert_eq!(TaskMarker::parse("[x]done"), None);
        assert_eq!(TaskMarker::parse("[link](x)"), None);
    }
}
