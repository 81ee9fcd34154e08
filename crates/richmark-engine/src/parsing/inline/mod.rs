//! # Inline Parsing
//!
//! Cursor-based inline parsing over the text of one block (paragraph,
//! heading, table cell, list item text).
//!
//! ## Modules
//!
//! - **`types`**: `InlineNode` (text, placeholder tag, link, image, math, footnote ref)
//! - **`kinds`**: inline syntax types owning their delimiters
//! - **`cursor`**: `Cursor` for byte/char scanning with absolute positions
//! - **`parser`**: `parse_inline()` entry point with `try_parse_*` helpers
//!
//! ## Raw Zone Precedence
//!
//! Code spans suppress all other inline parsing inside them. A
//! single-backtick span whose whole content matches the placeholder grammar
//! becomes a placeholder tag instead of inline code.
//!
//! ## Key Invariants
//!
//! - Marks never repeat: `**a **b** c**` does not double-bold `b`
//! - Emphasis that finds no closer is literal text, never an error
//! - Links do not nest; brackets inside link text stay literal

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::{parse_inline, plain_text};
pub use types::InlineNode;
