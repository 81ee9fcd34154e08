use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The kind of a tree node.
///
/// Built-in kinds are a closed set; plugins introduce their own kinds through
/// [`NodeKind::Custom`]. On the wire every kind is its kebab-case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    Code,
    Table,
    TableRow,
    TableCell,
    List,
    ListItem,
    Blockquote,
    ThematicBreak,
    Image,
    Video,
    Attachment,
    MathBlock,
    InlineMath,
    Link,
    FootnoteRef,
    FootnoteDef,
    Text,
    PlaceholderTag,
    FrontMatter,
    Custom(String),
}

impl NodeKind {
    /// Every built-in kind, in declaration order.
    pub const BUILTIN: [NodeKind; 22] = [
        NodeKind::Document,
        NodeKind::Paragraph,
        NodeKind::Heading,
        NodeKind::Code,
        NodeKind::Table,
        NodeKind::TableRow,
        NodeKind::TableCell,
        NodeKind::List,
        NodeKind::ListItem,
        NodeKind::Blockquote,
        NodeKind::ThematicBreak,
        NodeKind::Image,
        NodeKind::Video,
        NodeKind::Attachment,
        NodeKind::MathBlock,
        NodeKind::InlineMath,
        NodeKind::Link,
        NodeKind::FootnoteRef,
        NodeKind::FootnoteDef,
        NodeKind::Text,
        NodeKind::PlaceholderTag,
        NodeKind::FrontMatter,
    ];

    pub fn custom(name: impl Into<String>) -> Self {
        NodeKind::Custom(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Code => "code",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table-row",
            NodeKind::TableCell => "table-cell",
            NodeKind::List => "list",
            NodeKind::ListItem => "list-item",
            NodeKind::Blockquote => "blockquote",
            NodeKind::ThematicBreak => "thematic-break",
            NodeKind::Image => "image",
            NodeKind::Video => "video",
            NodeKind::Attachment => "attachment",
            NodeKind::MathBlock => "math-block",
            NodeKind::InlineMath => "inline-math",
            NodeKind::Link => "link",
            NodeKind::FootnoteRef => "footnote-ref",
            NodeKind::FootnoteDef => "footnote-def",
            NodeKind::Text => "text",
            NodeKind::PlaceholderTag => "placeholder-tag",
            NodeKind::FrontMatter => "front-matter",
            NodeKind::Custom(name) => name,
        }
    }

    /// Looks up a built-in kind by name.
    pub fn builtin(name: &str) -> Option<NodeKind> {
        Self::BUILTIN.into_iter().find(|k| k.as_str() == name)
    }

    /// Maps a wire name to a kind; unknown names become [`NodeKind::Custom`].
    pub fn from_name(name: &str) -> NodeKind {
        Self::builtin(name).unwrap_or_else(|| NodeKind::Custom(name.to_string()))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, NodeKind::Custom(_))
    }

    /// Leaf kinds never carry children.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Code
                | NodeKind::ThematicBreak
                | NodeKind::Image
                | NodeKind::Video
                | NodeKind::Attachment
                | NodeKind::MathBlock
                | NodeKind::InlineMath
                | NodeKind::FootnoteRef
                | NodeKind::FootnoteDef
                | NodeKind::Text
                | NodeKind::PlaceholderTag
                | NodeKind::FrontMatter
        )
    }

    /// Kinds that may carry inline marks.
    pub fn takes_marks(&self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::PlaceholderTag)
    }

    /// Kinds that occupy a block position of their own.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Document
                | NodeKind::Paragraph
                | NodeKind::Heading
                | NodeKind::Code
                | NodeKind::Table
                | NodeKind::TableRow
                | NodeKind::TableCell
                | NodeKind::List
                | NodeKind::ListItem
                | NodeKind::Blockquote
                | NodeKind::ThematicBreak
                | NodeKind::MathBlock
                | NodeKind::FootnoteDef
                | NodeKind::FrontMatter
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(NodeKind::from_name(&name))
    }
}
