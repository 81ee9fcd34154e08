#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

impl FenceKind {
    pub fn char(self) -> char {
        match self {
            FenceKind::Backticks => '`',
            FenceKind::Tildes => '~',
        }
    }
}

/// An opening fence line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceOpen {
    pub kind: FenceKind,
    /// Length of the delimiter run (at least 3).
    pub len: usize,
    /// Indentation of the opener; stripped from body lines.
    pub indent: usize,
    /// First word of the info string.
    pub language: String,
    /// Rest of the info string.
    pub meta: String,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Recognizes an opening fence: up to three spaces, then three or more
    /// backticks or tildes, then an optional info string. Backtick info
    /// strings may not contain backticks.
    pub fn open(line: &str) -> Option<FenceOpen> {
        let t = line.trim_start_matches(' ');
        let indent = line.len() - t.len();
        if indent > 3 {
            return None;
        }
        let kind = if t.starts_with(Self::BACKTICKS) {
            FenceKind::Backticks
        } else if t.starts_with(Self::TILDES) {
            FenceKind::Tildes
        } else {
            return None;
        };
        let len = t.len() - t.trim_start_matches(kind.char()).len();
        let info = t[len..].trim();
        if kind == FenceKind::Backticks && info.contains('`') {
            return None;
        }
        let (language, meta) = info.split_once(char::is_whitespace).unwrap_or((info, ""));
        Some(FenceOpen {
            kind,
            len,
            indent,
            language: language.to_string(),
            meta: meta.trim().to_string(),
        })
    }

    /// True when `line` closes `open`: same character, at least as long, and
    /// nothing but whitespace after it.
    pub fn closes(open: &FenceOpen, line: &str) -> bool {
        let t = line.trim_start_matches(' ');
        if line.len() - t.len() > 3 {
            return false;
        }
        let run = t.len() - t.trim_start_matches(open.kind.char()).len();
        run >= open.len && t[run..].trim().is_empty()
    }

    /// Shortest fence of `kind` that no line of `body` can close early.
    pub fn delimiter_for(kind: FenceKind, body: &str) -> String {
        let c = kind.char();
        let longest = body
            .lines()
            .map(|l| {
                let t = l.trim_start_matches(' ');
                t.len() - t.trim_start_matches(c).len()
            })
            .max()
            .unwrap_or(0);
        c.to_string().repeat(longest.max(2) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_backtick_fence_with_info() {
        let open = CodeFence::open("```rust title=main").unwrap();
        assert_eq!(open.kind, FenceKind::Backticks);
        assert_eq!(open.len, 3);
        assert_eq!(open.language, "rust");
        assert_eq!(open.meta, "title=main");
    }

    #[test]
    fn detect_long_tilde_fence() {
        let open = CodeFence::open("~~~~").unwrap();
        assert_eq!(open.kind, FenceKind::Tildes);
        assert_eq!(open.len, 4);
        assert_eq!(open.language, "");
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::open("hello"), None);
        assert_eq!(CodeFence::open("``"), None);
        assert_eq!(CodeFence::open("``` a`b"), None);
    }

    #[test]
    fn closes_matching_fence() {
        let open = CodeFence::open("````").unwrap();
        assert!(CodeFence::closes(&open, "`````"));
        assert!(CodeFence::closes(&open, "````  "));
        assert!(!CodeFence::closes(&open, "```"));
        assert!(!CodeFence::closes(&open, "```` x"));
    }

    #[test]
    fn does_not_close_mismatched_fence() {
        let open = CodeFence::open("```").unwrap();
        assert!(!CodeFence::closes(&open, "~~~"));
    }

    #[test]
    fn delimiter_outgrows_body_runs() {
        assert_eq!(CodeFence::delimiter_for(FenceKind::Backticks, "plain"), "```");
        assert_eq!(
            CodeFence::delimiter_for(FenceKind::Backticks, "```\ninner\n```"),
            "````"
        );
    }
}
