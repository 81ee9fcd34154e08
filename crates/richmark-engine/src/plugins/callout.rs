//! The bundled `warning` callout plugin.
//!
//! ````text
//! ```warning
//! Back up first.
//! ```
//! ````
//!
//! becomes a `warning` node whose text is `⚠️ 警告: Back up first.` and is
//! written back as the original fence.

use crate::{
    parsing::blocks::kinds::{CodeFence, FenceKind},
    tree::{Node, NodeKind},
};

use super::descriptor::{
    ConvertError, ParseConverter, PluginDescriptor, Selector, SerializeConverter,
};

pub const NAME: &str = "warning";
pub const WARNING_PREFIX: &str = "⚠️ 警告: ";

pub fn warning() -> PluginDescriptor {
    PluginDescriptor::new(NAME)
        .with_element_kind(NAME)
        .with_parse(ParseConverter::new(
            NAME,
            Selector::Fence(NAME.into()),
            |n| Ok(Node::new(NodeKind::custom(NAME)).with_text(format!("{WARNING_PREFIX}{}", n.text()))),
        ))
        .with_serialize(SerializeConverter::new(
            NAME,
            Selector::Kind(NodeKind::custom(NAME)),
            |n| {
                let body = n.text().strip_prefix(WARNING_PREFIX).ok_or_else(|| {
                    ConvertError::new(format!("text does not start with '{WARNING_PREFIX}'"))
                })?;
                let fence = CodeFence::delimiter_for(FenceKind::Backticks, body);
                Ok(format!("{fence}{NAME}\n{body}\n{fence}"))
            },
        ))
}
