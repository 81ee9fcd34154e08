use pretty_assertions::assert_eq;
use richmark_engine::{
    Document, Marks, Node, NodeKind, PlaceholderTag, PluginRegistry, TagValue, parse, serialize,
};
use rstest::rstest;

fn render(tag: PlaceholderTag, text: &str) -> String {
    let mut doc = Document::new();
    let root = doc.root();
    let para = doc.append(root, Node::new(NodeKind::Paragraph)).unwrap();
    let mut leaf = Node::tag_leaf(tag, Marks::NONE);
    leaf.text = text.to_string();
    doc.append(para, leaf).unwrap();
    serialize(&doc, &PluginRegistry::builtin())
}

#[rstest]
#[case::with_value(
    PlaceholderTag::new("请输入姓名").with_value(TagValue::Text("张三".into())),
    "",
    "`${placeholder:请输入姓名},value:张三`\n"
)]
#[case::default_text(PlaceholderTag::new("请输入姓名"), "默认文本", "`默认文本`\n")]
#[case::empty(PlaceholderTag::new("请输入姓名"), "", "`${placeholder:请输入姓名}`\n")]
#[case::undefined_value(
    PlaceholderTag::new("请输入姓名").with_value(TagValue::Undefined),
    "",
    "`${placeholder:请输入姓名},value:undefined`\n"
)]
fn serializes_each_tag_shape(#[case] tag: PlaceholderTag, #[case] text: &str, #[case] expected: &str) {
    assert_eq!(render(tag, text), expected);
}

#[test]
fn parses_tags_out_of_code_spans() {
    let doc = parse(
        "Name: `${placeholder:请输入姓名},value:张三` and `${placeholder:城市}`",
        &PluginRegistry::builtin(),
    )
    .tree;
    let tags: Vec<_> = doc
        .descendants(doc.root())
        .filter_map(|id| doc.node_ref(id))
        .filter_map(|n| n.tag().cloned())
        .collect();
    assert_eq!(
        tags,
        vec![
            PlaceholderTag::new("请输入姓名").with_value(TagValue::Text("张三".into())),
            PlaceholderTag::new("城市"),
        ]
    );
}

#[test]
fn malformed_tags_stay_code() {
    let doc = parse("`${placeholder:broken` `${other:x}`", &PluginRegistry::builtin()).tree;
    assert!(
        doc.descendants(doc.root())
            .filter_map(|id| doc.node_ref(id))
            .all(|n| n.kind() != &NodeKind::PlaceholderTag)
    );
}
