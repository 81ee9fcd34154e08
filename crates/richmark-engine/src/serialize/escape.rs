use crate::parsing::{
    blocks::{LineClass, MarkdownLineClassifier, kinds::Heading},
    inline::{InlineNode, parse_inline},
};

/// Characters that can start or close an inline construct.
pub const SPECIAL: [char; 10] = ['\\', '`', '*', '_', '~', '[', ']', '<', '$', '|'];

/// Backslash-escapes every inline-significant character.
pub fn escape_all(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes text for use between `[` and `]` where no inline parsing happens
/// (image alt text, attachment names).
pub fn escape_label(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// True when `text` on its own would not read back as the same plain text.
pub fn needs_escape(text: &str, in_table: bool) -> bool {
    if in_table && text.contains('|') {
        return true;
    }
    match parse_inline(0, text).as_slice() {
        [] => false,
        [InlineNode::Text { text: t, marks, .. }] => !marks.is_empty() || t != text,
        _ => true,
    }
}

/// Escapes a paragraph line that would otherwise open a block.
pub fn escape_line_start(line: &str) -> String {
    if matches!(
        MarkdownLineClassifier.classify(line),
        LineClass::Text | LineClass::Blank
    ) {
        return line.to_string();
    }
    let indent = line.len() - line.trim_start().len();
    let digits = line[indent..].bytes().take_while(u8::is_ascii_digit).count();
    let at = indent + digits;
    match line[at..].chars().next() {
        Some(c) if c.is_ascii_punctuation() => format!("{}\\{}", &line[..at], &line[at..]),
        _ => line.to_string(),
    }
}

/// Escapes a trailing `#` run that would be read as a closing sequence.
pub fn escape_heading_end(content: &str) -> String {
    let trimmed = content.trim_end_matches(Heading::MARKER);
    if trimmed.len() == content.len() {
        return content.to_string();
    }
    if trimmed.is_empty() || trimmed.ends_with([' ', '\t']) {
        format!("{trimmed}\\{}", &content[trimmed.len()..])
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn plain_text_is_left_alone() {
        assert!(!needs_escape("hello, world", false));
        assert!(!needs_escape("2 * 3", false));
        assert!(!needs_escape(r"a\b", false));
        assert!(needs_escape("*x*", false));
        assert!(needs_escape("a|b", true));
        assert!(!needs_escape("a|b", false));
    }

    #[test]
    fn escape_all_round_trips() {
        let raw = r"*a* _b_ `c` [d] \e $f$ <g>";
        let escaped = escape_all(raw);
        match parse_inline(0, &escaped).as_slice() {
            [InlineNode::Text { text, .. }] => assert_eq!(text, raw),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[rstest]
    #[case("# not a heading", r"\# not a heading")]
    #[case("- not a list", r"\- not a list")]
    #[case("12. not a list", r"12\. not a list")]
    #[case("> not a quote", r"\> not a quote")]
    #[case("```", r"\```")]
    #[case("[^1]: not a def", r"\[^1]: not a def")]
    #[case("plain", "plain")]
    #[case("C# is fine", "C# is fine")]
    fn line_starts(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(escape_line_start(line), expected);
    }

    #[test]
    fn heading_closing_runs() {
        assert_eq!(escape_heading_end("Title #"), r"Title \#");
        assert_eq!(escape_heading_end("C#"), "C#");
        assert_eq!(escape_heading_end("###"), r"\###");
        assert_eq!(escape_heading_end("Title"), "Title");
    }
}
