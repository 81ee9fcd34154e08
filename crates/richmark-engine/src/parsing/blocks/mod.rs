//! # Block Lexing
//!
//! Two-phase block lexing with a recursive container model.
//!
//! ## Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` from local facts only (fence opener, heading, list marker...)
//!
//! 2. **Event Emission** (`lexer`): a `BlockLexer` walks the classified lines,
//!    resolves context (paragraph continuation, tables, front-matter) and emits
//!    a flat `BlockEvent` stream. Container contents are stripped of their
//!    prefixes and lexed again one level deeper.
//!
//! ## Modules
//!
//! - **`types`**: `BlockEvent`, `BlockNode`, `BlockKind`, `ContainerFrame`
//! - **`kinds`**: block-specific types owning their delimiters
//! - **`classify`**: `MarkdownLineClassifier` produces a `LineClass` per line
//! - **`content`**: `ContentLine`, a source line after container stripping
//! - **`lexer`**: `BlockLexer`
//!
//! ## Key Invariants
//!
//! - Every `Open` event has exactly one matching `Close`
//! - Fenced code and math blocks are raw zones: no block/inline parsing inside
//! - Container nesting is capped at `lexer::MAX_NESTING`
//! - Problems are reported as warnings; no input is rejected

pub mod classify;
pub mod content;
pub mod kinds;
pub mod lexer;
pub mod types;

pub use classify::{LineClass, MarkdownLineClassifier};
pub use content::ContentLine;
pub use lexer::{BlockLexer, LexOutput, lex};
pub use types::{BlockEvent, BlockKind, BlockNode, ContainerFrame, ListInfo, TableBlock};
