/// Blockquote block type with owned delimiter constant.
///
/// All blockquote syntax knowledge lives here, not scattered in the
/// classifier or lexer.
pub struct BlockQuote;

impl BlockQuote {
    /// The blockquote prefix character.
    pub const PREFIX: char = '>';

    /// Strips one level of blockquote prefix, returning the byte offset where
    /// the quoted content begins.
    ///
    /// Accepts up to three spaces of indentation before `>` and swallows one
    /// optional space after it.
    pub fn strip_one(s: &str) -> Option<usize> {
        let b = s.as_bytes();
        let mut i = 0usize;
        while i < b.len() && i < 3 && b[i] == b' ' {
            i += 1;
        }
        if b.get(i) != Some(&(Self::PREFIX as u8)) {
            return None;
        }
        i += 1;
        if b.get(i) == Some(&b' ') {
            i += 1;
        }
        Some(i)
    }
}
