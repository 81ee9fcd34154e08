/// Footnote references `[^id]`.
pub struct FootnoteRef;

impl FootnoteRef {
    pub const OPEN: &'static [u8; 2] = b"[^";
    pub const CLOSE: u8 = b']';

    /// Returns the id and the bytes consumed. Ids are non-empty and contain
    /// no whitespace or brackets.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        let rest = s.strip_prefix("[^")?;
        let end = rest.find(|c: char| c == ']' || c == '[' || c.is_whitespace())?;
        if end == 0 || rest.as_bytes()[end] != Self::CLOSE {
            return None;
        }
        // `[^id]:` at line start is a definition, handled by the block lexer.
        Some((&rest[..end], end + 3))
    }

    pub fn render(id: &str) -> String {
        format!("[^{id}]")
    }
}
