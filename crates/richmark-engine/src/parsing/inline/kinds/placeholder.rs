use std::sync::OnceLock;

use regex::Regex;

use crate::tree::{PlaceholderTag, TagValue};

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\$\{placeholder:([^}]*)\}(?:,value:(.*))?$").expect("Invalid placeholder regex")
    })
}

/// Placeholder tags written inside a single-backtick code span.
///
/// ```text
/// `${placeholder:NAME}`
/// `${placeholder:NAME;initialValue:INIT}`
/// `${placeholder:NAME},value:VALUE`
/// ```
///
/// The value form has no closing brace after the value. Content that does
/// not match the whole grammar stays inline code.
pub struct PlaceholderSyntax;

impl PlaceholderSyntax {
    pub const OPEN: &'static str = "${placeholder:";
    pub const INITIAL: &'static str = ";initialValue:";
    pub const VALUE: &'static str = ",value:";

    pub fn parse(content: &str) -> Option<PlaceholderTag> {
        let caps = placeholder_regex().captures(content)?;
        let name = caps.get(1)?.as_str();
        let mut tag = match name.split_once(Self::INITIAL) {
            Some((placeholder, initial)) => {
                PlaceholderTag::new(placeholder).with_initial_value(initial)
            }
            None => PlaceholderTag::new(name),
        };
        if let Some(value) = caps.get(2) {
            tag = tag.with_value(match value.as_str() {
                "null" => TagValue::Null,
                "undefined" => TagValue::Undefined,
                other => TagValue::Text(other.to_string()),
            });
        }
        Some(tag)
    }

    /// Markdown for a tag leaf whose text is `text`.
    ///
    /// A value wins over the text; otherwise non-empty text is written as
    /// plain inline code and only an empty leaf keeps the placeholder form.
    /// An initial value is kept alongside a value.
    pub fn render(tag: &PlaceholderTag, text: &str) -> String {
        if tag.value.is_none() && !text.is_empty() {
            return super::code_span::CodeSpan::render(text);
        }
        let mut out = format!("`{}{}", Self::OPEN, tag.placeholder);
        if let Some(initial) = &tag.initial_value {
            out.push_str(Self::INITIAL);
            out.push_str(initial);
        }
        out.push('}');
        if let Some(value) = &tag.value {
            out.push_str(Self::VALUE);
            out.push_str(&value.to_string());
        }
        out.push('`');
        out
    }
}
