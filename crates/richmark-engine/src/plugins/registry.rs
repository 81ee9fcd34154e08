use std::{collections::BTreeSet, sync::Arc};

use crate::tree::NodeRef;

use super::{
    builtin,
    descriptor::{ParseConverter, PluginDescriptor, SerializeConverter},
};

#[derive(Debug, Default)]
struct Converters {
    plugins: Vec<String>,
    parse: Vec<ParseConverter>,
    serialize: Vec<SerializeConverter>,
    element_kinds: BTreeSet<String>,
}

/// The ordered, immutable converter set used by parsing and serialization.
///
/// Host plugins come first, the built-in converters last, so a plugin can
/// override any built-in behaviour. Cloning shares the same converters.
#[derive(Debug, Clone)]
pub struct PluginRegistry {
    inner: Arc<Converters>,
}

impl PluginRegistry {
    /// Only the built-in converters.
    pub fn builtin() -> Self {
        Self::with_plugins([])
    }

    pub fn with_plugins(plugins: impl IntoIterator<Item = PluginDescriptor>) -> Self {
        let mut converters = Converters::default();
        for plugin in plugins {
            log::debug!(
                "registering plugin '{}' ({} parse, {} serialize converters)",
                plugin.name,
                plugin.parse_markdown.len(),
                plugin.to_markdown.len()
            );
            converters.parse.extend(plugin.parse_markdown);
            converters.serialize.extend(plugin.to_markdown);
            converters.element_kinds.extend(plugin.element_kinds);
            converters.plugins.push(plugin.name);
        }
        converters.parse.extend(builtin::parse_converters());
        converters.serialize.extend(builtin::serialize_converters());
        Self {
            inner: Arc::new(converters),
        }
    }

    /// Names of the host plugins, in precedence order.
    pub fn plugin_names(&self) -> &[String] {
        &self.inner.plugins
    }

    /// Fence languages claimed by plugins.
    pub fn element_kinds(&self) -> &BTreeSet<String> {
        &self.inner.element_kinds
    }

    pub fn parse_converters(&self) -> &[ParseConverter] {
        &self.inner.parse
    }

    pub fn serialize_converters(&self) -> &[SerializeConverter] {
        &self.inner.serialize
    }

    /// First parse converter selecting `node`.
    pub fn find_parse(&self, node: NodeRef<'_>) -> Option<&ParseConverter> {
        self.inner.parse.iter().find(|c| c.matches(node))
    }

    /// First serialize converter selecting `node`.
    pub fn find_serialize(&self, node: NodeRef<'_>) -> Option<&SerializeConverter> {
        self.inner.serialize.iter().find(|c| c.matches(node))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        plugins::Selector,
        tree::{Document, Node, NodeKind},
    };

    fn registry_is_shareable<T: Send + Sync + Clone>() {}

    #[test]
    fn registry_is_send_sync() {
        registry_is_shareable::<PluginRegistry>();
    }

    #[test]
    fn plugins_precede_builtins() {
        let plugin = PluginDescriptor::new("math-override").with_parse(ParseConverter::new(
            "math-override",
            Selector::Fence("math".into()),
            |_| Ok(Node::new(NodeKind::custom("formula"))),
        ));
        let registry = PluginRegistry::with_plugins([plugin]);

        let mut doc = Document::new();
        let root = doc.root();
        let code = doc
            .append(
                root,
                Node::new(NodeKind::Code).with_attr("language", "math"),
            )
            .unwrap();
        let node = doc.node_ref(code).unwrap();
        assert_eq!(registry.find_parse(node).unwrap().name, "math-override");
        assert_eq!(
            PluginRegistry::builtin().find_parse(node).unwrap().name,
            "math-fence"
        );
    }

    #[test]
    fn element_kinds_are_unioned() {
        let a = PluginDescriptor::new("a").with_element_kind("x");
        let b = PluginDescriptor::new("b")
            .with_element_kind("y")
            .with_element_kind("x");
        let registry = PluginRegistry::with_plugins([a, b]);
        assert_eq!(
            registry.element_kinds().iter().collect::<Vec<_>>(),
            vec!["x", "y"]
        );
        assert_eq!(registry.plugin_names(), ["a", "b"]);
    }

    #[test]
    fn clones_share_converters() {
        let registry = PluginRegistry::builtin();
        let clone = registry.clone();
        assert!(Arc::ptr_eq(&registry.inner, &clone.inner));
    }
}
