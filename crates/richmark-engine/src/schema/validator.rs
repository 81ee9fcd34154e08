use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{plugins::PluginRegistry, tree::NodeKind};

use super::{
    nesting::{self, NestingError},
    report::{ValidationError, ValidationReport},
};

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_NODES: usize = 100_000;
/// Hard bound on JSON nesting checked before a payload is converted.
const MAX_JSON_NESTING: usize = 768;

const NODE_FIELDS: [&str; 10] = [
    "id",
    "kind",
    "attrs",
    "text",
    "marks",
    "tag",
    "placeholder",
    "value",
    "initial_value",
    "children",
];
const MARK_KEYS: [&str; 4] = ["bold", "italic", "strike", "code"];

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Structural validator for document trees arriving from outside.
///
/// A plain value: it holds only its limits and the extra kinds it accepts,
/// and never panics on any input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidator {
    pub max_depth: usize,
    pub max_nodes: usize,
    extra_kinds: BTreeSet<String>,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            extra_kinds: BTreeSet::new(),
        }
    }

    /// Also accepts the element kinds declared by the registry's plugins.
    pub fn for_registry(registry: &PluginRegistry) -> Self {
        Self {
            extra_kinds: registry.element_kinds().clone(),
            ..Self::new()
        }
    }

    pub fn with_limits(mut self, max_depth: usize, max_nodes: usize) -> Self {
        self.max_depth = max_depth;
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.extra_kinds.insert(kind.into());
        self
    }

    /// Validates any serializable payload. Values serde cannot represent
    /// (non-string map keys, say) are reported, not raised.
    pub fn validate<T: Serialize + ?Sized>(&self, data: &T) -> ValidationReport {
        // A node sits two containers below its parent; leave room for the
        // walk to report the exact path of a moderately deep node.
        let limit = self
            .max_depth
            .saturating_mul(2)
            .saturating_add(256)
            .min(MAX_JSON_NESTING);
        if let Err(NestingError::TooDeep(_)) = nesting::check(data, limit) {
            log::debug!("payload nests past {limit} containers; not converting");
            return ValidationReport::from_errors(vec![ValidationError {
                path: "$".into(),
                message: format!("nested deeper than {} levels", self.max_depth.min(limit / 2)),
            }]);
        }
        match serde_json::to_value(data) {
            Ok(value) => self.validate_value(&value),
            Err(e) => ValidationReport::from_errors(vec![ValidationError {
                path: "$".into(),
                message: format!("payload cannot be represented as JSON: {e}"),
            }]),
        }
    }

    pub fn validate_value(&self, value: &Value) -> ValidationReport {
        let mut walk = Walk {
            validator: self,
            errors: Vec::new(),
            nodes: 0,
            stack: Vec::new(),
        };
        match value {
            Value::Object(map) if map.contains_key("root") => walk.document(map),
            Value::Object(_) => walk.stack.push(("$".to_string(), value, 1)),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate().rev() {
                    walk.stack.push((format!("$[{i}]"), item, 1));
                }
            }
            other => walk.error(
                "$",
                format!(
                    "expected a document, a node or an array of nodes, found {}",
                    type_name(other)
                ),
            ),
        }
        walk.run();
        ValidationReport::from_errors(walk.errors)
    }

    fn known_kind(&self, name: &str) -> bool {
        NodeKind::builtin(name).is_some() || self.extra_kinds.contains(name)
    }
}

struct Walk<'v, 's> {
    validator: &'s SchemaValidator,
    errors: Vec<ValidationError>,
    nodes: usize,
    /// Pending nodes: path, value, depth.
    stack: Vec<(String, &'v Value, usize)>,
}

impl<'v> Walk<'v, '_> {
    fn error(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn document(&mut self, map: &'v Map<String, Value>) {
        for key in map.keys().filter(|k| !matches!(k.as_str(), "root" | "footnotes")) {
            self.error(&format!("$.{key}"), "unknown document field");
        }
        if let Some(root) = map.get("root") {
            if let Some(kind) = root.get("kind").and_then(Value::as_str) {
                if kind != NodeKind::Document.as_str() {
                    self.error("$.root.kind", format!("root must be a document node, found '{kind}'"));
                }
            }
            self.stack.push(("$.root".to_string(), root, 1));
        }
        match map.get("footnotes") {
            None => {}
            Some(Value::Object(entries)) => {
                for (id, entry) in entries {
                    self.footnote(&format!("$.footnotes.{id}"), entry);
                }
            }
            Some(other) => self.error(
                "$.footnotes",
                format!("expected an object, found {}", type_name(other)),
            ),
        }
    }

    fn footnote(&mut self, path: &str, entry: &Value) {
        let Value::Object(map) = entry else {
            self.error(path, format!("expected an object, found {}", type_name(entry)));
            return;
        };
        match map.get("text") {
            Some(Value::String(_)) => {}
            Some(other) => self.error(
                &format!("{path}.text"),
                format!("expected a string, found {}", type_name(other)),
            ),
            None => self.error(path, "footnote entry is missing 'text'"),
        }
        match map.get("url") {
            None | Some(Value::String(_)) | Some(Value::Null) => {}
            Some(other) => self.error(
                &format!("{path}.url"),
                format!("expected a string or null, found {}", type_name(other)),
            ),
        }
        for key in map.keys().filter(|k| !matches!(k.as_str(), "text" | "url")) {
            self.error(&format!("{path}.{key}"), "unknown footnote field");
        }
    }

    fn run(&mut self) {
        while let Some((path, value, depth)) = self.stack.pop() {
            self.nodes += 1;
            if self.nodes > self.validator.max_nodes {
                self.error(
                    &path,
                    format!("more than {} nodes; validation stopped", self.validator.max_nodes),
                );
                self.stack.clear();
                return;
            }
            if depth > self.validator.max_depth {
                self.error(
                    &path,
                    format!("nested deeper than {} levels", self.validator.max_depth),
                );
                continue;
            }
            self.node(&path, value, depth);
        }
    }

    fn node(&mut self, path: &str, value: &'v Value, depth: usize) {
        let Value::Object(map) = value else {
            self.error(path, format!("expected a node object, found {}", type_name(value)));
            return;
        };

        for key in map.keys().filter(|k| !NODE_FIELDS.contains(&k.as_str())) {
            self.error(&format!("{path}.{key}"), "unknown node field");
        }

        let kind = match map.get("kind") {
            Some(Value::String(name)) if self.validator.known_kind(name) => {
                Some(NodeKind::from_name(name))
            }
            Some(Value::String(name)) => {
                self.error(&format!("{path}.kind"), format!("unknown node kind '{name}'"));
                None
            }
            Some(other) => {
                self.error(
                    &format!("{path}.kind"),
                    format!("expected a string, found {}", type_name(other)),
                );
                None
            }
            None => {
                self.error(path, "node is missing 'kind'");
                None
            }
        };

        if let Some(id) = map.get("id") {
            if id.as_u64().is_none() {
                self.error(&format!("{path}.id"), "expected a non-negative integer");
            }
        }
        if let Some(text) = map.get("text") {
            if !text.is_string() {
                self.error(
                    &format!("{path}.text"),
                    format!("expected a string, found {}", type_name(text)),
                );
            }
        }
        self.attrs(path, map.get("attrs"), kind.as_ref());
        self.marks(path, map.get("marks"), kind.as_ref());
        self.tag(path, map, kind.as_ref());

        match map.get("children") {
            None => {}
            Some(Value::Array(children)) => {
                if kind.as_ref().is_some_and(NodeKind::is_leaf) && !children.is_empty() {
                    self.error(
                        &format!("{path}.children"),
                        format!(
                            "{} nodes cannot have children",
                            kind.as_ref().map_or("leaf", NodeKind::as_str)
                        ),
                    );
                }
                for (i, child) in children.iter().enumerate().rev() {
                    self.stack.push((format!("{path}.children[{i}]"), child, depth + 1));
                }
            }
            Some(other) => self.error(
                &format!("{path}.children"),
                format!("expected an array, found {}", type_name(other)),
            ),
        }
    }

    fn attrs(&mut self, path: &str, attrs: Option<&Value>, kind: Option<&NodeKind>) {
        let map = match attrs {
            None => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                self.error(
                    &format!("{path}.attrs"),
                    format!("expected an object, found {}", type_name(other)),
                );
                return;
            }
        };
        if let Some(map) = map {
            for (key, value) in map {
                if !value.is_string() {
                    self.error(
                        &format!("{path}.attrs.{key}"),
                        format!("expected a string, found {}", type_name(value)),
                    );
                }
            }
        }
        if kind == Some(&NodeKind::Heading) {
            match map.and_then(|m| m.get("level")) {
                Some(Value::String(level)) => {
                    if !level.parse::<u8>().is_ok_and(|l| (1..=6).contains(&l)) {
                        self.error(
                            &format!("{path}.attrs.level"),
                            format!("heading level must be 1-6, found '{level}'"),
                        );
                    }
                }
                Some(_) => {}
                None => self.error(path, "heading is missing attrs.level"),
            }
        }
    }

    fn marks(&mut self, path: &str, marks: Option<&Value>, kind: Option<&NodeKind>) {
        let Some(marks) = marks else {
            return;
        };
        let Value::Object(map) = marks else {
            self.error(
                &format!("{path}.marks"),
                format!("expected an object, found {}", type_name(marks)),
            );
            return;
        };
        let mut any_set = false;
        for (key, value) in map {
            let at = format!("{path}.marks.{key}");
            if !MARK_KEYS.contains(&key.as_str()) {
                self.error(&at, "unknown mark");
            }
            match value {
                Value::Bool(on) => any_set |= on,
                other => self.error(&at, format!("expected a boolean, found {}", type_name(other))),
            }
        }
        if any_set && kind.is_some_and(|k| !k.takes_marks()) {
            self.error(
                &format!("{path}.marks"),
                "marks are only allowed on text and placeholder-tag nodes",
            );
        }
    }

    fn tag(&mut self, path: &str, map: &Map<String, Value>, kind: Option<&NodeKind>) {
        let is_tag_kind = kind == Some(&NodeKind::PlaceholderTag);
        match map.get("tag") {
            None if is_tag_kind => self.error(path, "placeholder-tag node needs \"tag\": true"),
            None => {}
            Some(Value::Bool(true)) if !is_tag_kind && kind.is_some() => {
                self.error(&format!("{path}.tag"), "only placeholder-tag nodes carry a tag")
            }
            Some(Value::Bool(true)) => {}
            Some(Value::Bool(false)) if is_tag_kind => {
                self.error(&format!("{path}.tag"), "placeholder-tag node needs \"tag\": true")
            }
            Some(Value::Bool(false)) => {}
            Some(other) => self.error(
                &format!("{path}.tag"),
                format!("expected a boolean, found {}", type_name(other)),
            ),
        }

        match map.get("placeholder") {
            Some(Value::String(_)) => {}
            None if is_tag_kind => self.error(path, "placeholder-tag node is missing 'placeholder'"),
            None => {}
            Some(other) => self.error(
                &format!("{path}.placeholder"),
                format!("expected a string, found {}", type_name(other)),
            ),
        }
        if let Some(value @ (Value::Array(_) | Value::Object(_))) = map.get("value") {
            self.error(
                &format!("{path}.value"),
                format!("expected a scalar or null, found {}", type_name(value)),
            );
        }
        if let Some(initial) = map.get("initial_value") {
            if !initial.is_string() {
                self.error(
                    &format!("{path}.initial_value"),
                    format!("expected a string, found {}", type_name(initial)),
                );
            }
        }
    }
}
