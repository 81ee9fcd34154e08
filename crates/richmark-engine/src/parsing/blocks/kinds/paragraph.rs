/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters - they are the default leaf block when no
/// other block opener matches. Inline parsing is applied to their content.
pub struct Paragraph;

impl Paragraph {
    /// Normalizes collected lines: leading indentation and trailing
    /// whitespace are not content.
    pub fn content<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
        lines
            .into_iter()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
