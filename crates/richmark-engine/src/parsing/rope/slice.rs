use xi_rope::Rope;

use super::span::Span;

/// Extracts the text for a span from the rope as an owned String.
pub fn slice_to_string(rope: &Rope, sp: Span) -> String {
    rope.slice_to_cow(sp.start..sp.end).into_owned()
}

/// Extracts text for a span, cut to at most `max` characters with a "..."
/// suffix. Used to quote source in warning messages.
pub fn preview(rope: &Rope, sp: Span, max: usize) -> String {
    let s = slice_to_string(rope, sp);
    let s = s.trim_end_matches(['\r', '\n']);
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        let rope = Rope::from("hello");
        assert_eq!(preview(&rope, Span::new(0, 5), 10), "hello");
    }

    #[test]
    fn preview_drops_trailing_newline() {
        let rope = Rope::from("```rust\n");
        assert_eq!(preview(&rope, Span::new(0, 8), 10), "```rust");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let rope = Rope::from("脚注脚注脚注");
        let len = "脚注脚注脚注".len();
        assert_eq!(preview(&rope, Span::new(0, len), 2), "脚注...");
    }

    #[test]
    fn slice_to_string_partial_span() {
        let rope = Rope::from("hello world");
        assert_eq!(slice_to_string(&rope, Span::new(6, 11)), "world");
    }
}
