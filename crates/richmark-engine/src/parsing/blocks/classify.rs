use super::kinds::{
    BlockQuote, CodeFence, FenceOpen, FootnoteDef, Heading, ListMarker, MathBlock, ThematicBreak,
};

/// Classification of a single line containing only local facts.
///
/// This is the first phase of block lexing: each line is classified
/// independently, without reference to surrounding context. Context-sensitive
/// decisions (tables, paragraph continuation, front-matter) belong to the
/// lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Blank,
    Fence(FenceOpen),
    MathFence,
    /// Single-line `$$ ... $$`.
    MathLine(String),
    Heading { level: u8, content: String },
    ThematicBreak,
    Quote,
    ListItem(ListMarker),
    FootnoteDef { id: String, body_offset: usize },
    Text,
}

/// Classifies individual lines for the block lexing phase.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    /// Classifies a line (already stripped of container prefixes).
    ///
    /// Precedence: fences beat everything, and thematic breaks are checked
    /// before list markers so `- - -` and `* * *` are breaks.
    pub fn classify(&self, text: &str) -> LineClass {
        if text.trim().is_empty() {
            return LineClass::Blank;
        }
        if let Some(open) = CodeFence::open(text) {
            return LineClass::Fence(open);
        }
        if MathBlock::opens(text) {
            return LineClass::MathFence;
        }
        if let Some(body) = MathBlock::single_line(text) {
            return LineClass::MathLine(body.to_string());
        }
        if let Some((level, content)) = Heading::parse(text) {
            return LineClass::Heading {
                level,
                content: content.to_string(),
            };
        }
        if ThematicBreak::matches(text) {
            return LineClass::ThematicBreak;
        }
        if BlockQuote::strip_one(text).is_some() {
            return LineClass::Quote;
        }
        if let Some(marker) = ListMarker::parse(text) {
            return LineClass::ListItem(marker);
        }
        if let Some((id, body_offset)) = FootnoteDef::parse(text) {
            return LineClass::FootnoteDef {
                id: id.to_string(),
                body_offset,
            };
        }
        LineClass::Text
    }

    /// Classification used while a nesting limit is in force: container
    /// openers degrade to text.
    pub fn classify_flat(&self, text: &str) -> LineClass {
        match self.classify(text) {
            LineClass::Quote | LineClass::ListItem(_) => LineClass::Text,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn class_name(c: &LineClass) -> &'static str {
        match c {
            LineClass::Blank => "blank",
            LineClass::Fence(_) => "fence",
            LineClass::MathFence => "math-fence",
            LineClass::MathLine(_) => "math-line",
            LineClass::Heading { .. } => "heading",
            LineClass::ThematicBreak => "break",
            LineClass::Quote => "quote",
            LineClass::ListItem(_) => "list-item",
            LineClass::FootnoteDef { .. } => "footnote-def",
            LineClass::Text => "text",
        }
    }

    #[rstest]
    #[case("", "blank")]
    #[case("   ", "blank")]
    #[case("```js", "fence")]
    #[case("$$", "math-fence")]
    #[case("$$ x $$", "math-line")]
    #[case("## Title", "heading")]
    #[case("* * *", "break")]
    #[case("---", "break")]
    #[case("> quoted", "quote")]
    #[case("- item", "list-item")]
    #[case("3. third", "list-item")]
    #[case("[^note]: body", "footnote-def")]
    #[case("plain text", "text")]
    #[case("| a | b |", "text")]
    fn classifies_lines(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(class_name(&MarkdownLineClassifier.classify(line)), expected);
    }

    #[test]
    fn flat_classification_keeps_leaves() {
        let c = MarkdownLineClassifier;
        assert_eq!(c.classify_flat("> deep"), LineClass::Text);
        assert_eq!(c.classify_flat("---"), LineClass::ThematicBreak);
    }
}
