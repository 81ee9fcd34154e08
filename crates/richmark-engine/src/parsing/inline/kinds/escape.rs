/// Backslash escapes of ASCII punctuation.
pub struct Escape;

impl Escape {
    pub const BACKSLASH: u8 = b'\\';

    /// The escaped character when `s` starts with a valid escape.
    pub fn parse(s: &str) -> Option<char> {
        let mut chars = s.chars();
        (chars.next()? == Self::BACKSLASH as char)
            .then(|| chars.next())
            .flatten()
            .filter(char::is_ascii_punctuation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_punctuation_escapes() {
        assert_eq!(Escape::parse(r"\*x"), Some('*'));
        assert_eq!(Escape::parse(r"\\"), Some('\\'));
        assert_eq!(Escape::parse(r"\a"), None);
        assert_eq!(Escape::parse(r"\"), None);
        assert_eq!(Escape::parse("x"), None);
    }
}
