/// `[^id]: body` footnote definition.
pub struct FootnoteDef;

impl FootnoteDef {
    pub const OPEN: &'static str = "[^";
    pub const CLOSE: &'static str = "]:";
    /// Continuation lines are indented by this many spaces.
    pub const CONTINUATION_INDENT: usize = 4;

    /// Returns the id and the byte offset where the body starts.
    pub fn parse(line: &str) -> Option<(&str, usize)> {
        let t = line.trim_start_matches(' ');
        let indent = line.len() - t.len();
        if indent > 3 {
            return None;
        }
        let rest = t.strip_prefix(Self::OPEN)?;
        let end = rest.find(Self::CLOSE)?;
        let id = &rest[..end];
        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || c == ']' || c == '[') {
            return None;
        }
        let body_at = indent + Self::OPEN.len() + end + Self::CLOSE.len();
        let body = &line[body_at..];
        let spaces = body.len() - body.trim_start_matches(' ').len();
        Some((id, body_at + spaces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_definition() {
        let line = "[^1]: 详细信息";
        let (id, at) = FootnoteDef::parse(line).unwrap();
        assert_eq!(id, "1");
        assert_eq!(&line[at..], "详细信息");
    }

    #[test]
    fn rejects_references_and_bad_ids() {
        assert_eq!(FootnoteDef::parse("[^1] not a def"), None);
        assert_eq!(FootnoteDef::parse("[^]: empty"), None);
        assert_eq!(FootnoteDef::parse("[^a b]: spaced"), None);
    }
}
