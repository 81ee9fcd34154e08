/// Autolinks `<scheme://...>` and `<mailto:...>`.
pub struct Autolink;

impl Autolink {
    pub const OPEN: u8 = b'<';
    pub const CLOSE: u8 = b'>';

    /// Returns the href and the bytes consumed when `s` starts with an
    /// autolink.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        let inner = s.strip_prefix(Self::OPEN as char)?;
        let end = inner.find(|c: char| c == Self::CLOSE as char || c == '<' || c.is_whitespace())?;
        if inner.as_bytes()[end] != Self::CLOSE {
            return None;
        }
        let href = &inner[..end];
        Self::has_scheme(href).then_some((href, end + 2))
    }

    /// `scheme:` with a 2-32 character scheme of letters, digits, `+`, `.`
    /// or `-`, starting with a letter.
    pub fn has_scheme(href: &str) -> bool {
        let Some((scheme, rest)) = href.split_once(':') else {
            return false;
        };
        (2..=32).contains(&scheme.len())
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
            && !rest.is_empty()
    }

    /// True when `href` can be written back as `<href>`.
    pub fn can_render(href: &str) -> bool {
        Self::has_scheme(href) && !href.contains(|c: char| c.is_whitespace() || c == '<' || c == '>')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_links() {
        assert_eq!(Autolink::parse("<https://x.y/z> rest"), Some(("https://x.y/z", 15)));
        assert_eq!(Autolink::parse("<mailto:a@b.c>"), Some(("mailto:a@b.c", 14)));
    }

    #[test]
    fn rejects_non_links() {
        assert_eq!(Autolink::parse("<div>"), None);
        assert_eq!(Autolink::parse("<a b:c>"), None);
        assert_eq!(Autolink::parse("<https://open"), None);
        assert_eq!(Autolink::parse("<x:y>"), None);
    }
}
