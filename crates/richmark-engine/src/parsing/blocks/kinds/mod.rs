pub mod block_quote;
pub mod code_fence;
pub mod footnote_def;
pub mod front_matter;
pub mod heading;
pub mod list_marker;
pub mod math_block;
pub mod paragraph;
pub mod table_row;
pub mod thematic_break;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use footnote_def::FootnoteDef;
pub use front_matter::FrontMatter;
pub use heading::Heading;
pub use list_marker::{ListMarker, TaskMarker};
pub use math_block::MathBlock;
pub use paragraph::Paragraph;
pub use table_row::{Alignment, TableRow};
pub use thematic_break::ThematicBreak;
