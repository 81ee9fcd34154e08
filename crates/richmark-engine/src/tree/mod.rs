//! # Document Tree
//!
//! Arena-backed typed node tree shared by the parser, the serializer and
//! host editors.
//!
//! ## Modules
//!
//! - **`kind`**: `NodeKind`, the closed set of built-in kinds plus `Custom`
//! - **`node`**: `Node` payload, `NodeId`, `Marks`, `PlaceholderTag`
//! - **`document`**: `Document` arena, structural operations, `NodeRef` views
//! - **`exchange`**: nested serde form used across process boundaries
//! - **`invariants`**: structural checks used by tests
//!
//! ## Key Invariants
//!
//! - The reachable tree is acyclic and every non-root node appears exactly
//!   once in its parent's children
//! - Parents are stored as indices, never references
//! - Marks only appear on text and placeholder-tag leaves

pub mod document;
pub mod exchange;
pub mod invariants;
pub mod kind;
pub mod node;

pub use document::{Descendants, Document, NodeRef, TreeError};
pub use exchange::{DocumentTree, ImportError, NodeTree};
pub use kind::NodeKind;
pub use node::{Mark, Marks, Node, NodeId, PlaceholderTag, TagValue};
