/// Thematic break: three or more `-`, `*` or `_`, optionally spaced.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const CANONICAL: &'static str = "---";
    /// Used at the top of a document, where `---` opens front matter.
    pub const LEADING: &'static str = "***";

    pub fn matches(line: &str) -> bool {
        let t = line.trim();
        if line.len() - line.trim_start_matches(' ').len() > 3 {
            return false;
        }
        let Some(c) = t.chars().next() else {
            return false;
        };
        if !matches!(c, '-' | '*' | '_') {
            return false;
        }
        let mut count = 0;
        for ch in t.chars() {
            if ch == c {
                count += 1;
            } else if ch != ' ' && ch != '\t' {
                return false;
            }
        }
        count >= 3
    }
}
