/// ATX heading (`#` through `######`).
pub struct Heading;

impl Heading {
    pub const MARKER: char = '#';
    pub const MAX_LEVEL: usize = 6;

    /// Returns the level and the heading text with any closing `#` run removed.
    pub fn parse(line: &str) -> Option<(u8, &str)> {
        let t = line.trim_start_matches(' ');
        if line.len() - t.len() > 3 {
            return None;
        }
        let level = t.len() - t.trim_start_matches(Self::MARKER).len();
        if level == 0 || level > Self::MAX_LEVEL {
            return None;
        }
        let rest = &t[level..];
        if !(rest.is_empty() || rest.starts_with([' ', '\t'])) {
            return None;
        }
        let mut content = rest.trim();
        let without_closing = content.trim_end_matches(Self::MARKER);
        if without_closing.is_empty() {
            content = "";
        } else if without_closing.ends_with([' ', '\t']) {
            content = without_closing.trim_end();
        }
        Some((level as u8, content))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("# Title", Some((1, "Title")))]
    #[case("###### Deep", Some((6, "Deep")))]
    #[case("####### Too deep", None)]
    #[case("#NoSpace", None)]
    #[case("#", Some((1, "")))]
    #[case("## Closed ##", Some((2, "Closed")))]
    #[case("## C#", Some((2, "C#")))]
    #[case("   # Indented", Some((1, "Indented")))]
    #[case("    # Code", None)]
    fn parses_atx_headings(#[case] line: &str, #[case] expected: Option<(u8, &str)>) {
        assert_eq!(Heading::parse(line), expected);
    }
}
