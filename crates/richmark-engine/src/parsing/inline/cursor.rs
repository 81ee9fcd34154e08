/// A cursor for inline parsing with position tracking.
///
/// Operates over a string slice while tracking the absolute byte position
/// in the source (via `base` offset). Byte-level methods are for ASCII
/// delimiters; text is consumed with [`Cursor::bump_char`] so multi-byte
/// characters are never split.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being parsed.
    pub s: &'a str,
    /// Base offset in the source (added to local index for absolute positions).
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s` with the given base offset.
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Returns the current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|r| r.starts_with(pat))
    }

    /// The unconsumed remainder.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Length of the run of byte `b` starting at the cursor.
    pub fn run_len(&self, b: u8) -> usize {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .iter()
            .take_while(|&&c| c == b)
            .count()
    }

    /// The character before the cursor, if any.
    pub fn prev_char(&self) -> Option<char> {
        self.s.get(..self.i).and_then(|s| s.chars().next_back())
    }

    /// The character starting `n` bytes after the cursor.
    pub fn char_after(&self, n: usize) -> Option<char> {
        self.s.get(self.i + n..).and_then(|s| s.chars().next())
    }

    /// Advances by one character.
    pub fn bump_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello", 10);
        assert_eq!(cur.pos(), 10);
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump_char(), Some('h'));
        assert_eq!(cur.pos(), 11);
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("**bold**", 0);
        assert!(cur.starts_with(b"**"));
        assert!(!cur.starts_with(b"~~"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("", 0);
        assert_eq!(cur.rest(), "");
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.prev_char(), None);
        assert_eq!(cur.rest(), "");
    }

    #[test]
    fn starts_with_at_eof() {
        let mut cur = Cursor::new("ab", 0);
        cur.bump_n(2);
        assert_eq!(cur.rest(), "");
        assert!(cur.starts_with(b""));
        assert!(!cur.starts_with(b"a"));
    }

    #[test]
    fn bump_n_past_end() {
        // bump_n does not bounds check; caller must ensure validity
        let mut cur = Cursor::new("hi", 0);
        cur.bump_n(10);
        assert_eq!(cur.rest(), "");
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.run_len(b'h'), 0);
        assert!(!cur.starts_with(b"h"));
    }

    #[test]
    fn runs_and_neighbours() {
        let mut cur = Cursor::new("a***b", 0);
        cur.bump_char();
        assert_eq!(cur.run_len(b'*'), 3);
        assert_eq!(cur.prev_char(), Some('a'));
        assert_eq!(cur.char_after(3), Some('b'));
    }

    #[test]
    fn bump_char_keeps_utf8_boundaries() {
        let mut cur = Cursor::new("脚注", 0);
        assert_eq!(cur.bump_char(), Some('脚'));
        assert_eq!(cur.i, 3);
        assert_eq!(cur.prev_char(), Some('脚'));
    }
}
