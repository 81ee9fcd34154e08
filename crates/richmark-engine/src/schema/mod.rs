//! # Schema Validation
//!
//! Checks that an arbitrary payload has the shape of a document tree before
//! anything imports it.
//!
//! ## Accepted Shapes
//!
//! - a document object: `{ "root": node, "footnotes": { id: { text, url } } }`
//! - a single node object
//! - an array of node objects (a fragment)
//!
//! ## Key Invariants
//!
//! - Total: every input yields a report, nothing panics
//! - `errors` is empty iff `valid`
//! - Traversal is iterative and bounded by depth and node-count limits
//! - Payloads nested past a fixed bound are rejected before conversion

mod nesting;
pub mod report;
pub mod validator;

pub use report::{ValidationError, ValidationReport};
pub use validator::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, SchemaValidator};

use serde::Serialize;

/// Validates `data` with the default limits and built-in kinds only.
pub fn validate<T: Serialize + ?Sized>(data: &T) -> ValidationReport {
    SchemaValidator::new().validate(data)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn messages(report: &ValidationReport) -> Vec<String> {
        report.errors.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn accepts_a_small_document() {
        let report = validate(&json!({
            "root": {"kind": "document", "children": [
                {"kind": "heading", "attrs": {"level": "2"}, "children": [{"kind": "text", "text": "T"}]},
                {"kind": "paragraph", "children": [
                    {"kind": "text", "text": "b", "marks": {"bold": true}},
                    {"kind": "placeholder-tag", "tag": true, "placeholder": "name", "value": null}
                ]}
            ]},
            "footnotes": {"1": {"text": "note", "url": null}}
        }));
        assert_eq!(report, ValidationReport { valid: true, errors: vec![] });
    }

    #[test]
    fn reports_every_problem_with_a_path() {
        let report = validate(&json!([
            {"kind": "heading", "attrs": {"level": "9"}},
            {"kind": "paragraph", "marks": {"bold": true}},
            {"kind": "text", "children": [{"kind": "text"}]},
            {"kind": "placeholder-tag", "value": [1]},
            {"kind": "nope", "id": -1}
        ]));
        assert!(!report.valid);
        assert_eq!(
            messages(&report),
            vec![
                "$[0].attrs.level: heading level must be 1-6, found '9'",
                "$[1].marks: marks are only allowed on text and placeholder-tag nodes",
                "$[2].children: text nodes cannot have children",
                "$[3]: placeholder-tag node needs \"tag\": true",
                "$[3]: placeholder-tag node is missing 'placeholder'",
                "$[3].value: expected a scalar or null, found array",
                "$[4].kind: unknown node kind 'nope'",
                "$[4].id: expected a non-negative integer",
            ]
        );
    }

    #[test]
    fn plugin_kinds_need_registration() {
        let node = json!({"kind": "warning", "text": "x"});
        assert!(!validate(&node).valid);
        assert!(SchemaValidator::new().with_kind("warning").validate(&node).valid);
    }

    #[test]
    fn limits_stop_descent() {
        let mut node = json!({"kind": "text"});
        for _ in 0..10 {
            node = json!({"kind": "blockquote", "children": [node]});
        }
        let report = SchemaValidator::new().with_limits(5, 1000).validate(&node);
        assert_eq!(
            messages(&report),
            vec!["$.children[0].children[0].children[0].children[0].children[0]: nested deeper than 5 levels"]
        );

        let wide = json!({"kind": "paragraph", "children": vec![json!({"kind": "text"}); 20]});
        let report = SchemaValidator::new().with_limits(10, 5).validate(&wide);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].message.contains("more than 5 nodes"));
    }
}
