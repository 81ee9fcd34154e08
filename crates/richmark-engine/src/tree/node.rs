use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use super::kind::NodeKind;

/// Arena index of a node. Stable for the lifetime of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Inline formatting flags carried by text and placeholder-tag leaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
}

impl Marks {
    pub const NONE: Marks = Marks {
        bold: false,
        italic: false,
        strike: false,
        code: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    pub fn with(mut self, mark: Mark) -> Self {
        self.set(mark, true);
        self
    }

    pub fn has(&self, mark: Mark) -> bool {
        match mark {
            Mark::Bold => self.bold,
            Mark::Italic => self.italic,
            Mark::Strike => self.strike,
            Mark::Code => self.code,
        }
    }

    pub fn set(&mut self, mark: Mark, on: bool) {
        match mark {
            Mark::Bold => self.bold = on,
            Mark::Italic => self.italic = on,
            Mark::Strike => self.strike = on,
            Mark::Code => self.code = on,
        }
    }
}

/// A single inline mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Bold,
    Italic,
    Strike,
    Code,
}

impl Mark {
    /// Marks that nest as delimiter runs, outermost first when runs tie.
    pub const NESTING: [Mark; 3] = [Mark::Bold, Mark::Italic, Mark::Strike];
}

/// The value carried by a placeholder tag.
///
/// `Null` and `Undefined` are real values: a tag holding either still counts
/// as having a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Text(String),
    Null,
    Undefined,
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Null => f.write_str("null"),
            TagValue::Undefined => f.write_str("undefined"),
        }
    }
}

/// Payload of a placeholder-tag leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTag {
    pub placeholder: String,
    pub value: Option<TagValue>,
    pub initial_value: Option<String>,
}

impl PlaceholderTag {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            value: None,
            initial_value: None,
        }
    }

    pub fn with_value(mut self, value: TagValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_initial_value(mut self, initial: impl Into<String>) -> Self {
        self.initial_value = Some(initial.into());
        self
    }
}

/// One slot of the document arena.
///
/// `kind`, `attrs`, `text`, `marks` and `tag` are the node's payload and are
/// freely editable. Identity and structure (`id`, `parent`, `children`) are
/// owned by [`super::Document`] and change only through its structural
/// operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub marks: Marks,
    pub tag: Option<PlaceholderTag>,
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            text: String::new(),
            marks: Marks::NONE,
            tag: None,
            id: NodeId(0),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn text_leaf(text: impl Into<String>, marks: Marks) -> Self {
        Self::new(NodeKind::Text).with_text(text).with_marks(marks)
    }

    pub fn tag_leaf(tag: PlaceholderTag, marks: Marks) -> Self {
        let mut node = Self::new(NodeKind::PlaceholderTag).with_marks(marks);
        node.tag = Some(tag);
        node
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_marks(mut self, marks: Marks) -> Self {
        self.marks = marks;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// True when the attribute is present and equal to `"true"`.
    pub fn flag(&self, key: &str) -> bool {
        self.attr(key) == Some("true")
    }

    /// Copies the payload of `other` into `self`, keeping identity and structure.
    pub(crate) fn take_payload(&mut self, other: Node) {
        self.kind = other.kind;
        self.attrs = other.attrs;
        self.text = other.text;
        self.marks = other.marks;
        self.tag = other.tag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_value_renders_null_and_undefined_literally() {
        assert_eq!(TagValue::Null.to_string(), "null");
        assert_eq!(TagValue::Undefined.to_string(), "undefined");
        assert_eq!(TagValue::Text(String::new()).to_string(), "");
    }

    #[test]
    fn empty_value_still_counts_as_present() {
        let tag = PlaceholderTag::new("name").with_value(TagValue::Text(String::new()));
        assert_eq!(tag.value, Some(TagValue::Text(String::new())));
    }

    #[test]
    fn marks_toggle_independently() {
        let marks = Marks::NONE.with(Mark::Bold).with(Mark::Code);
        assert!(marks.has(Mark::Bold));
        assert!(!marks.has(Mark::Italic));
        assert!(marks.code);
        assert!(!marks.is_empty());
    }
}
