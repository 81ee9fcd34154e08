//! # richmark engine
//!
//! Converts Markdown to a typed document tree and back.
//!
//! ## Modules
//!
//! - **`parsing`**: block lexer, inline scanner, tree builder
//! - **`tree`**: arena document, node kinds, nested exchange form
//! - **`plugins`**: converter registry and the built-in converters
//! - **`footnotes`**: reference/definition resolution
//! - **`serialize`**: tree back to Markdown
//! - **`schema`**: structural validation of externally supplied trees
//! - **`warning`**: recoverable problems reported alongside results

pub mod footnotes;
pub mod parsing;
pub mod plugins;
pub mod schema;
pub mod serialize;
pub mod tree;
pub mod warning;

pub use footnotes::{FootnoteEntry, FootnoteResolver, FootnoteTable};
pub use parsing::{ParseOptions, ParseResult, parse, parse_with};
pub use plugins::{ConvertError, PluginDescriptor, PluginRegistry, Selector};
pub use schema::{SchemaValidator, ValidationError, ValidationReport, validate};
pub use serialize::{SerializeResult, serialize, serialize_with_warnings};
pub use tree::{
    Document, DocumentTree, ImportError, Mark, Marks, Node, NodeId, NodeKind, NodeRef, NodeTree,
    PlaceholderTag, TagValue, TreeError,
};
pub use warning::Warning;
