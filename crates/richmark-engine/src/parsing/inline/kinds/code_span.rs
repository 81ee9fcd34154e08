/// Code span inline type with owned delimiter constant.
///
/// Code spans are "raw zones" - no other inline parsing occurs inside them.
pub struct CodeSpan;

impl CodeSpan {
    /// The backtick character that delimits code spans.
    pub const TICK: u8 = b'`';

    /// Finds the closing run of exactly `run` backticks in `rest`, returning
    /// the byte offset where it starts.
    pub fn find_close(rest: &str, run: usize) -> Option<usize> {
        let b = rest.as_bytes();
        let mut i = 0;
        while i < b.len() {
            if b[i] == Self::TICK {
                let len = b[i..].iter().take_while(|&&c| c == Self::TICK).count();
                if len == run {
                    return Some(i);
                }
                i += len;
            } else {
                i += 1;
            }
        }
        None
    }

    /// Strips one space from each side when both are present and the content
    /// is not all spaces, so `` `` `x` `` `` can carry a backtick.
    pub fn trim_content(inner: &str) -> &str {
        if inner.len() >= 2
            && inner.starts_with(' ')
            && inner.ends_with(' ')
            && !inner.trim().is_empty()
        {
            &inner[1..inner.len() - 1]
        } else {
            inner
        }
    }

    /// Renders `content` as a code span whose fence no inner run can close.
    pub fn render(content: &str) -> String {
        let longest = content
            .split(|c| c != '`')
            .map(str::len)
            .max()
            .unwrap_or(0);
        let fence = "`".repeat(longest + 1);
        let pad = content.starts_with('`')
            || content.ends_with('`')
            || (content.starts_with(' ') && content.ends_with(' ') && !content.trim().is_empty());
        if longest == 0 && !pad {
            return format!("`{content}`");
        }
        if pad {
            format!("{fence} {content} {fence}")
        } else {
            format!("{fence}{content}{fence}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_must_match_run_length() {
        assert_eq!(CodeSpan::find_close("a``b`", 1), Some(4));
        assert_eq!(CodeSpan::find_close("a``b", 1), None);
        assert_eq!(CodeSpan::find_close("x `` y``", 2), Some(2));
    }

    #[test]
    fn content_trimming() {
        assert_eq!(CodeSpan::trim_content(" `x` "), "`x`");
        assert_eq!(CodeSpan::trim_content("  "), "  ");
        assert_eq!(CodeSpan::trim_content(" a"), " a");
    }

    #[test]
    fn render_picks_a_longer_fence() {
        assert_eq!(CodeSpan::render("plain"), "`plain`");
        assert_eq!(CodeSpan::render("a`b"), "``a`b``");
        assert_eq!(CodeSpan::render("`x`"), "`` `x` ``");
    }
}
