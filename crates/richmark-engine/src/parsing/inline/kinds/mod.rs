//! Inline syntax kinds.
//!
//! Each kind owns its delimiter constants and the recognizer for its
//! syntax. The recognizers are pure functions over the unconsumed input;
//! [`super::parser`] decides the order they are tried in.

pub mod autolink;
pub mod code_span;
pub mod emphasis;
pub mod escape;
pub mod footnote_ref;
pub mod inline_math;
pub mod link;
pub mod placeholder;

pub use autolink::Autolink;
pub use code_span::CodeSpan;
pub use emphasis::{Delim, Emphasis};
pub use escape::Escape;
pub use footnote_ref::FootnoteRef;
pub use inline_math::InlineMath;
pub use link::{Destination, Link, LinkIndex};
pub use placeholder::PlaceholderSyntax;
