use crate::{
    parsing::rope::span::Span,
    tree::{Marks, PlaceholderTag},
};

/// A parsed inline node.
///
/// Spans are absolute byte offsets into the block content the scanner was
/// given (shifted by its base offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Text with the marks active where it appeared. Inline code is text
    /// carrying the `code` mark.
    Text {
        span: Span,
        text: String,
        marks: Marks,
    },
    /// A placeholder tag written as a single-backtick code span.
    Tag {
        span: Span,
        tag: PlaceholderTag,
        marks: Marks,
    },
    Link {
        span: Span,
        href: String,
        title: Option<String>,
        /// Written as `<href>`.
        autolink: bool,
        children: Vec<InlineNode>,
    },
    Image {
        span: Span,
        src: String,
        alt: String,
        title: Option<String>,
    },
    InlineMath {
        span: Span,
        tex: String,
    },
    FootnoteRef {
        span: Span,
        id: String,
    },
}

impl InlineNode {
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text { span, .. }
            | InlineNode::Tag { span, .. }
            | InlineNode::Link { span, .. }
            | InlineNode::Image { span, .. }
            | InlineNode::InlineMath { span, .. }
            | InlineNode::FootnoteRef { span, .. } => *span,
        }
    }
}
