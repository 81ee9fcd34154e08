use pretty_assertions::assert_eq;
use richmark_engine::{ParseOptions, PluginRegistry, Warning, parse, parse_with};

const DOC: &str = "\
Claim one[^1] and two[^src].

## 脚注

[^1]: 详细信息
[^src]: https://example.com/paper The paper
";

#[test]
fn builds_the_table_in_definition_order() {
    let parsed = parse(DOC, &PluginRegistry::builtin());
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

    let table: Vec<_> = parsed
        .tree
        .footnotes
        .iter()
        .map(|(id, e)| (id.clone(), e.text.clone(), e.url.clone()))
        .collect();
    assert_eq!(
        table,
        vec![
            ("1".to_string(), "详细信息".to_string(), None),
            (
                "src".to_string(),
                "The paper".to_string(),
                Some("https://example.com/paper".to_string())
            ),
        ]
    );
}

#[test]
fn unresolved_references_are_reported_not_fatal() {
    let parsed = parse("See[^gone].\n", &PluginRegistry::builtin());
    assert!(matches!(
        parsed.warnings.as_slice(),
        [Warning::UnresolvedReference { id, .. }] if id == "gone"
    ));
    let doc = &parsed.tree;
    let kept = doc
        .descendants(doc.root())
        .filter_map(|id| doc.node_ref(id))
        .any(|n| n.attr("id") == Some("gone") && n.attr("resolved") == Some("false"));
    assert!(kept);
}

#[test]
fn duplicate_definitions_keep_the_first() {
    let parsed = parse("x[^a]\n\n[^a]: first\n\n[^a]: second\n", &PluginRegistry::builtin());
    assert_eq!(parsed.tree.footnotes.get("a").map(|e| e.text.as_str()), Some("first"));
    assert!(
        parsed
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::DuplicateFootnote { id, .. } if id == "a"))
    );
}

#[test]
fn custom_region_markers() {
    let md = "x[^1]\n\n## Notes\n\n[^1]: body\n";
    let options = ParseOptions {
        footnote_markers: vec!["Notes".into()],
    };
    let parsed = parse_with(md, &PluginRegistry::builtin(), &options);
    let region = parsed.tree.footnotes.region().and_then(|id| parsed.tree.node_ref(id));
    assert_eq!(region.map(|h| h.text_content()), Some("Notes".to_string()));
}
