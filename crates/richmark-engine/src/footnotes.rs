//! # Footnote Resolution
//!
//! A post-pass over the built tree. Definitions (`[^id]: body`) are folded
//! into an ordered [`FootnoteTable`]; references (`[^id]`) are checked
//! against it. The table is rebuilt from scratch on every run, so resolving
//! an edited document never sees stale entries.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    tree::{Document, NodeId, NodeKind},
    warning::Warning,
};

/// A resolved footnote definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnoteEntry {
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    /// The `footnote-def` node the entry came from.
    #[serde(skip)]
    pub definition: Option<NodeId>,
}

/// Footnote definitions keyed by id, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FootnoteTable {
    entries: IndexMap<String, FootnoteEntry>,
    region: Option<NodeId>,
}

impl FootnoteTable {
    pub fn from_entries(entries: IndexMap<String, FootnoteEntry>) -> Self {
        Self {
            entries,
            region: None,
        }
    }

    pub fn get(&self, id: &str) -> Option<&FootnoteEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FootnoteEntry)> {
        self.entries.iter()
    }

    /// The heading that opens the definitions region, if the document has one.
    pub fn region(&self) -> Option<NodeId> {
        self.region
    }
}

/// Outcome of one resolver run. Pure data; nothing has been written back.
#[derive(Debug, Clone, Default)]
pub struct FootnoteResolution {
    pub table: FootnoteTable,
    pub resolved: Vec<NodeId>,
    pub unresolved: Vec<(NodeId, String)>,
    pub duplicates: Vec<(NodeId, String)>,
}

impl FootnoteResolution {
    pub fn warnings(&self) -> Vec<Warning> {
        let dupes = self.duplicates.iter().map(|(node, id)| Warning::DuplicateFootnote {
            id: id.clone(),
            node: *node,
        });
        let missing = self
            .unresolved
            .iter()
            .map(|(node, id)| Warning::UnresolvedReference {
                id: id.clone(),
                node: *node,
            });
        dupes.chain(missing).collect()
    }
}

#[derive(Debug, Clone)]
pub struct FootnoteResolver {
    markers: Vec<String>,
}

impl FootnoteResolver {
    pub const DEFAULT_MARKERS: [&'static str; 2] = ["Footnotes", "脚注"];

    /// `markers` are heading texts that open the definitions region.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn resolve(&self, doc: &Document) -> FootnoteResolution {
        let mut out = FootnoteResolution::default();
        let mut refs = Vec::new();

        for id in doc.descendants(doc.root()) {
            let Some(node) = doc.node_ref(id) else {
                continue;
            };
            match node.kind() {
                NodeKind::Heading if out.table.region.is_none() => {
                    let title = node.text_content();
                    if self.markers.iter().any(|m| m == title.trim()) {
                        out.table.region = Some(id);
                    }
                }
                NodeKind::FootnoteDef => {
                    let Some(key) = node.attr("id") else {
                        continue;
                    };
                    if out.table.entries.contains_key(key) {
                        out.duplicates.push((id, key.to_string()));
                        continue;
                    }
                    let (url, text) = split_definition(node.text());
                    out.table.entries.insert(
                        key.to_string(),
                        FootnoteEntry {
                            text,
                            url,
                            definition: Some(id),
                        },
                    );
                }
                NodeKind::FootnoteRef => {
                    if let Some(key) = node.attr("id") {
                        refs.push((id, key.to_string()));
                    }
                }
                _ => {}
            }
        }

        // References may point forward, so they are checked after the fold.
        for (id, key) in refs {
            if out.table.contains(&key) {
                out.resolved.push(id);
            } else {
                out.unresolved.push((id, key));
            }
        }
        out
    }

    /// Resolves and writes the result back: the table onto the document and a
    /// `resolved` attribute onto every reference.
    pub fn apply(&self, doc: &mut Document) -> Vec<Warning> {
        let resolution = self.resolve(doc);
        for id in &resolution.resolved {
            set_resolved(doc, *id, true);
        }
        for (id, _) in &resolution.unresolved {
            set_resolved(doc, *id, false);
        }
        let warnings = resolution.warnings();
        for w in &warnings {
            log::warn!("{w}");
        }
        doc.footnotes = resolution.table;
        warnings
    }
}

impl Default for FootnoteResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARKERS)
    }
}

fn set_resolved(doc: &mut Document, id: NodeId, resolved: bool) {
    if let Some(node) = doc.get_mut(id) {
        node.attrs.insert("resolved".into(), resolved.to_string());
    }
}

/// Splits a definition body into an optional leading URL and the rest.
fn split_definition(body: &str) -> (Option<String>, String) {
    let body = body.trim();
    let (first, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    if first.starts_with("http://") || first.starts_with("https://") {
        (Some(first.to_string()), rest.trim().to_string())
    } else {
        (None, body.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tree::{Marks, Node};

    fn doc_with(defs: &[(&str, &str)], refs: &[&str]) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        let para = doc.push_child(root, Node::new(NodeKind::Paragraph));
        for r in refs {
            doc.push_child(para, Node::new(NodeKind::FootnoteRef).with_attr("id", *r));
        }
        for (id, body) in defs {
            doc.push_child(
                root,
                Node::new(NodeKind::FootnoteDef)
                    .with_attr("id", *id)
                    .with_text(*body),
            );
        }
        doc
    }

    #[rstest]
    #[case("详细信息", None, "详细信息")]
    #[case("https://example.com 来源", Some("https://example.com"), "来源")]
    #[case("http://a.b", Some("http://a.b"), "")]
    #[case("see https://example.com", None, "see https://example.com")]
    fn definition_bodies_split_leading_urls(
        #[case] body: &str,
        #[case] url: Option<&str>,
        #[case] text: &str,
    ) {
        assert_eq!(
            split_definition(body),
            (url.map(str::to_string), text.to_string())
        );
    }

    #[test]
    fn resolves_forward_references() {
        let mut doc = doc_with(&[("1", "详细信息")], &["1"]);
        let warnings = FootnoteResolver::default().apply(&mut doc);

        assert!(warnings.is_empty());
        let entry = doc.footnotes.get("1").unwrap();
        assert_eq!(entry.text, "详细信息");
        assert_eq!(entry.url, None);
        assert_eq!(doc.get(NodeId(2)).unwrap().attr("resolved"), Some("true"));
    }

    #[test]
    fn unresolved_references_are_kept_and_reported() {
        let mut doc = doc_with(&[], &["missing"]);
        let warnings = FootnoteResolver::default().apply(&mut doc);

        assert_eq!(
            warnings,
            vec![Warning::UnresolvedReference {
                id: "missing".into(),
                node: NodeId(2)
            }]
        );
        assert_eq!(doc.get(NodeId(2)).unwrap().attr("resolved"), Some("false"));
    }

    #[test]
    fn first_definition_wins() {
        let doc = doc_with(&[("a", "first"), ("a", "second")], &[]);
        let resolution = FootnoteResolver::default().resolve(&doc);

        assert_eq!(resolution.table.get("a").unwrap().text, "first");
        assert_eq!(resolution.duplicates, vec![(NodeId(3), "a".to_string())]);
    }

    #[test]
    fn marker_heading_opens_region() {
        let mut doc = Document::new();
        let root = doc.root();
        let heading = doc.push_child(root, Node::new(NodeKind::Heading).with_attr("level", "2"));
        doc.push_text(heading, "脚注", Marks::NONE);

        let resolution = FootnoteResolver::default().resolve(&doc);
        assert_eq!(resolution.table.region(), Some(heading));

        let custom = FootnoteResolver::new(["Notes"]).resolve(&doc);
        assert_eq!(custom.table.region(), None);
    }

    #[test]
    fn rerunning_rebuilds_the_table() {
        let mut doc = doc_with(&[("1", "x")], &["1"]);
        let resolver = FootnoteResolver::default();
        resolver.apply(&mut doc);
        doc.detach(NodeId(3)).unwrap();

        let warnings = resolver.apply(&mut doc);
        assert!(doc.footnotes.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
