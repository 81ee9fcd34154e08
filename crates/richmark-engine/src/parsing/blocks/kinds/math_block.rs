/// Display math delimited by `$$` lines.
pub struct MathBlock;

impl MathBlock {
    pub const DELIM: &'static str = "$$";

    pub fn opens(line: &str) -> bool {
        line.trim() == Self::DELIM
    }

    pub fn closes(line: &str) -> bool {
        line.trim() == Self::DELIM
    }

    /// `$$ x $$` on one line.
    pub fn single_line(line: &str) -> Option<&str> {
        let t = line.trim();
        if t.len() <= 2 * Self::DELIM.len() {
            return None;
        }
        t.strip_prefix(Self::DELIM)?
            .strip_suffix(Self::DELIM)
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiters() {
        assert!(MathBlock::opens("$$"));
        assert!(MathBlock::opens("  $$ "));
        assert!(!MathBlock::opens("$$x"));
    }

    #[test]
    fn single_line_math() {
        assert_eq!(MathBlock::single_line("$$ e=mc^2 $$"), Some("e=mc^2"));
        assert_eq!(MathBlock::single_line("$$$$"), None);
        assert_eq!(MathBlock::single_line("$$x"), None);
    }
}
