use crate::tree::Mark;

use super::super::cursor::Cursor;

/// An emphasis delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    /// `**` or `__`.
    Strong(u8),
    /// `*` or `_`.
    Emph(u8),
    /// `~~`.
    Strike,
}

impl Delim {
    pub fn byte(self) -> u8 {
        match self {
            Delim::Strong(b) | Delim::Emph(b) => b,
            Delim::Strike => Emphasis::TILDE,
        }
    }

    pub fn len(self) -> usize {
        match self {
            Delim::Emph(_) => 1,
            Delim::Strong(_) | Delim::Strike => 2,
        }
    }

    pub fn mark(self) -> Mark {
        match self {
            Delim::Strong(_) => Mark::Bold,
            Delim::Emph(_) => Mark::Italic,
            Delim::Strike => Mark::Strike,
        }
    }
}

/// Emphasis, strong emphasis and strikethrough delimiters.
///
/// Openers must be followed by a non-space character and closers preceded
/// by one. Underscores never open or close inside a word.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: u8 = b'*';
    pub const UNDERSCORE: u8 = b'_';
    pub const TILDE: u8 = b'~';

    /// Canonical delimiter written for each mark.
    pub fn canonical(mark: Mark) -> &'static str {
        match mark {
            Mark::Bold => "**",
            Mark::Italic => "*",
            Mark::Strike => "~~",
            Mark::Code => "`",
        }
    }

    pub fn is_delim_byte(b: u8) -> bool {
        matches!(b, Self::STAR | Self::UNDERSCORE | Self::TILDE)
    }

    /// Delimiters that could open here, longest first.
    pub fn openers(cur: &Cursor<'_>) -> Vec<Delim> {
        let Some(b) = cur.peek() else {
            return vec![];
        };
        let run = cur.run_len(b);
        let candidates = match b {
            Self::TILDE if run == 2 => vec![Delim::Strike],
            Self::STAR | Self::UNDERSCORE if run >= 2 => vec![Delim::Strong(b), Delim::Emph(b)],
            Self::STAR | Self::UNDERSCORE => vec![Delim::Emph(b)],
            _ => vec![],
        };
        candidates
            .into_iter()
            .filter(|d| {
                let next_ok = cur.char_after(d.len()).is_some_and(|c| !c.is_whitespace());
                let word_ok = b != Self::UNDERSCORE || !cur.prev_char().is_some_and(char::is_alphanumeric);
                next_ok && word_ok
            })
            .collect()
    }

    /// True when the cursor sits on a closer for `d`.
    pub fn closes(cur: &Cursor<'_>, d: Delim) -> bool {
        let b = d.byte();
        if cur.peek() != Some(b) {
            return false;
        }
        let run = cur.run_len(b);
        let run_ok = match d {
            Delim::Strong(_) => run >= 2,
            Delim::Emph(_) => run == 1 || run >= 3,
            Delim::Strike => run == 2,
        };
        let prev_ok = cur.prev_char().is_some_and(|c| !c.is_whitespace());
        let word_ok =
            b != Self::UNDERSCORE || !cur.char_after(d.len()).is_some_and(char::is_alphanumeric);
        run_ok && prev_ok && word_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str, i: usize) -> Cursor<'_> {
        let mut cur = Cursor::new(s, 0);
        cur.bump_n(i);
        cur
    }

    #[test]
    fn triple_star_offers_strong_then_emph() {
        assert_eq!(
            Emphasis::openers(&at("***x", 0)),
            vec![Delim::Strong(b'*'), Delim::Emph(b'*')]
        );
    }

    #[test]
    fn opener_needs_following_text() {
        assert!(Emphasis::openers(&at("* x", 0)).is_empty());
        assert!(Emphasis::openers(&at("~~ x", 0)).is_empty());
        assert_eq!(Emphasis::openers(&at("** x", 0)), vec![Delim::Emph(b'*')]);
    }

    #[test]
    fn intraword_underscore_is_literal() {
        assert!(Emphasis::openers(&at("snake_case", 5)).is_empty());
        assert!(!Emphasis::closes(&at("a_b", 1), Delim::Emph(b'_')));
    }

    #[test]
    fn emph_closer_skips_double_runs() {
        assert!(Emphasis::closes(&at("a*", 1), Delim::Emph(b'*')));
        assert!(!Emphasis::closes(&at("a**", 1), Delim::Emph(b'*')));
        assert!(Emphasis::closes(&at("a***", 1), Delim::Emph(b'*')));
        assert!(!Emphasis::closes(&at("a *", 2), Delim::Emph(b'*')));
    }

    #[test]
    fn strike_needs_exactly_two_tildes() {
        assert_eq!(Emphasis::openers(&at("~~x", 0)), vec![Delim::Strike]);
        assert!(Emphasis::openers(&at("~~~x", 0)).is_empty());
        assert!(Emphasis::closes(&at("x~~", 1), Delim::Strike));
    }
}
