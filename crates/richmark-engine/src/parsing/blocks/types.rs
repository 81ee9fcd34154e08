use crate::parsing::rope::span::Span;

use super::kinds::{Alignment, FenceKind};

/// Attributes of a list container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListInfo {
    pub ordered: bool,
    /// Bullet character or ordered delimiter.
    pub symbol: char,
    /// Number of the first item (ordered lists).
    pub start: u64,
    /// No blank lines between items or between blocks inside an item.
    pub tight: bool,
}

/// A frame in the container stack representing a nesting level.
///
/// Containers wrap leaf blocks and can nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerFrame {
    BlockQuote,
    List(ListInfo),
    ListItem {
        /// Task state for `[ ]` / `[x]` items.
        checked: Option<bool>,
    },
}

/// A pipe table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub alignments: Vec<Alignment>,
    pub header: Vec<String>,
    /// Body rows, padded or truncated to the header width.
    pub rows: Vec<Vec<String>>,
}

/// The kind of a leaf block, carrying its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph {
        content: String,
    },
    Heading {
        level: u8,
        content: String,
    },
    /// A fenced code block (``` or ~~~). A raw zone: no inline parsing.
    FencedCode {
        kind: FenceKind,
        language: String,
        meta: String,
        body: String,
        /// Set when the language names a plugin element kind.
        element: Option<String>,
        terminated: bool,
    },
    MathBlock {
        body: String,
        terminated: bool,
    },
    Table(TableBlock),
    ThematicBreak,
    FrontMatter {
        raw: String,
    },
    FootnoteDef {
        id: String,
        body: String,
    },
}

/// A lexed leaf block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    /// Full byte span including delimiters and container prefixes.
    pub span: Span,
    /// 1-based line the block starts on.
    pub line: usize,
}

/// Flat event stream produced by the lexer.
///
/// Every `Open` is matched by exactly one later `Close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockEvent {
    Open { frame: ContainerFrame, span: Span },
    Close,
    Leaf(BlockNode),
}
