use pretty_assertions::assert_eq;
use richmark_engine::{
    PluginRegistry, SchemaValidator, parse, plugins::callout, validate,
};
use serde_json::{Value, json};

#[test]
fn parsed_trees_always_validate() {
    let registry = PluginRegistry::with_plugins([callout::warning()]);
    let md = "# T\n\n- [x] a **b**\n\n| x |\n| --- |\n| `${placeholder:p}` |\n\n```warning\nw\n```\n\nn[^1]\n\n[^1]: d\n";
    let tree = parse(md, &registry).tree.to_tree();

    let report = SchemaValidator::for_registry(&registry).validate(&tree);
    assert_eq!(report.errors, vec![]);
    assert!(report.valid);
    assert!(!validate(&tree).valid, "warning kind is unknown without the plugin");
}

#[test]
fn validation_is_total() {
    let payloads = [
        json!(null),
        json!(42),
        json!("document"),
        json!({}),
        json!([]),
        json!([null, 1, {"kind": 3}]),
        json!({"root": 5, "footnotes": []}),
        json!({"root": {"kind": "paragraph"}}),
        json!({"kind": "text", "marks": {"bold": "yes", "underline": true}}),
    ];
    for payload in &payloads {
        let report = validate(payload);
        assert_eq!(report.valid, report.errors.is_empty(), "{payload}");
    }
    assert!(validate(&json!([])).valid);
    assert!(!validate(&json!({})).valid);
}

#[test]
fn non_finite_numbers_and_odd_types_are_reported() {
    assert!(!validate(&f64::NAN).valid);
    assert!(!validate(&()).valid);

    let mut keyed = std::collections::HashMap::new();
    keyed.insert((1, 2), "tuple keys");
    let report = validate(&keyed);
    assert!(!report.valid);
    assert_eq!(report.errors[0].path, "$");
}

#[test]
fn deep_payloads_do_not_overflow() {
    let mut node = json!({"kind": "text", "text": "x"});
    for _ in 0..300 {
        node = json!({"kind": "blockquote", "children": [node]});
    }
    let report = validate(&node);
    assert!(!report.valid);
    assert!(report.errors[0].message.contains("nested deeper than 128"));
}

/// Takes a deep chain apart one level at a time; dropping it whole would
/// recurse once per level.
fn dismantle(mut node: Value) {
    while let Some(Value::Array(mut children)) =
        node.as_object_mut().and_then(|map| map.remove("children"))
    {
        match children.pop() {
            Some(child) => node = child,
            None => break,
        }
    }
}

#[test]
fn very_deep_payloads_are_reported_not_converted() {
    let mut node = json!({"kind": "text", "text": "x"});
    for _ in 0..200_000 {
        node = json!({"kind": "blockquote", "children": [node]});
    }

    let report = validate(&node);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path, "$");
    assert_eq!(report.errors[0].message, "nested deeper than 128 levels");

    let report = SchemaValidator::new().validate_value(&node);
    assert!(!report.valid);
    assert!(report.errors[0].message.contains("nested deeper than 128"));

    dismantle(node);
}

#[test]
fn report_serializes_for_hosts() {
    let report = validate(&json!({"kind": "heading", "attrs": {"level": "0"}}));
    assert_eq!(
        serde_json::to_value(&report).unwrap(),
        json!({
            "valid": false,
            "errors": [{"path": "$.attrs.level", "message": "heading level must be 1-6, found '0'"}]
        })
    );
}
