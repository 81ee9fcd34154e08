use serde::Serialize;
use thiserror::Error;

use crate::{parsing::rope::Span, tree::NodeId};

/// A problem the pipeline recovered from.
///
/// Warnings never abort processing: the affected content is kept in a
/// degraded but faithful form and the warning is returned alongside the
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    #[error("line {line}: {message}")]
    RecoverableParse {
        line: usize,
        span: Span,
        message: String,
    },
    #[error("plugin converter '{plugin}' failed on node {node}: {message}")]
    PluginConversion {
        plugin: String,
        node: NodeId,
        message: String,
    },
    #[error("footnote reference [^{id}] at node {node} has no definition")]
    UnresolvedReference { id: String, node: NodeId },
    #[error("footnote [^{id}] is defined again at node {node}; the first definition wins")]
    DuplicateFootnote { id: String, node: NodeId },
    #[error("node {node} cannot be written as markdown and was kept as text: {message}")]
    Unrepresentable { node: NodeId, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_serialize_with_a_type_tag() {
        let w = Warning::UnresolvedReference {
            id: "2".into(),
            node: NodeId(5),
        };
        assert_eq!(
            serde_json::to_value(&w).unwrap(),
            serde_json::json!({"type": "unresolved_reference", "id": "2", "node": 5})
        );
        assert_eq!(
            w.to_string(),
            "footnote reference [^2] at node #5 has no definition"
        );
    }
}
