//! # Parsing
//!
//! Markdown source to [`Document`].
//!
//! ## Pipeline
//!
//! 1. **`blocks`**: the block lexer turns lines into a flat `BlockEvent` stream
//! 2. **`inline`**: block content is scanned into inline nodes
//! 3. **`build`**: events and inline nodes become the arena tree, then the
//!    registry's parse converters rewrite matching nodes
//! 4. the footnote resolver links references to definitions
//!
//! Every stage recovers from malformed input and reports a [`Warning`]
//! instead of failing.

pub mod blocks;
pub mod build;
pub mod inline;
pub mod rope;

use xi_rope::Rope;

use crate::{
    footnotes::FootnoteResolver, plugins::PluginRegistry, tree::Document, warning::Warning,
};

/// Options beyond the registry that shape a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Heading texts that open the footnote definitions region.
    pub footnote_markers: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            footnote_markers: FootnoteResolver::DEFAULT_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParseResult {
    pub tree: Document,
    pub warnings: Vec<Warning>,
}

pub fn parse(markdown: &str, registry: &PluginRegistry) -> ParseResult {
    parse_with(markdown, registry, &ParseOptions::default())
}

pub fn parse_with(markdown: &str, registry: &PluginRegistry, options: &ParseOptions) -> ParseResult {
    let rope = Rope::from(markdown);
    let lexed = blocks::lex(&rope, registry.element_kinds());
    let mut warnings = lexed.warnings;

    let mut tree = build::build_tree(&lexed.events);
    warnings.extend(build::apply_converters(&mut tree, registry));
    warnings.extend(FootnoteResolver::new(options.footnote_markers.iter().cloned()).apply(&mut tree));

    log::debug!(
        "parsed {} bytes into {} nodes with {} warnings",
        markdown.len(),
        tree.arena_len(),
        warnings.len()
    );
    ParseResult { tree, warnings }
}
