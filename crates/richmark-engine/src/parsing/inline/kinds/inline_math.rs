use super::escape::Escape;

/// Inline math `$tex$`.
///
/// The opening `$` must be followed by a non-space and the closing one
/// preceded by a non-space and not followed by a digit, so prices like
/// `$5 and $6` stay text. `$$` never opens inline math.
pub struct InlineMath;

impl InlineMath {
    pub const DELIM: u8 = b'$';

    /// Returns the tex source and the bytes consumed.
    pub fn parse(s: &str) -> Option<(&str, usize)> {
        Self::scan(s).ok()
    }

    /// Like [`InlineMath::parse`], but a failed scan reports how many bytes
    /// it looked at. No `$` inside that range closes math, wherever it opens.
    pub fn scan(s: &str) -> Result<(&str, usize), usize> {
        let rest = s.strip_prefix('$').ok_or(0usize)?;
        let first = rest.chars().next().ok_or(0usize)?;
        if first == '$' || first.is_whitespace() {
            return Err(0);
        }
        let b = rest.as_bytes();
        let mut i = 0;
        while i < b.len() {
            match b[i] {
                Escape::BACKSLASH => i += 2,
                b'\n' => return Err(1 + i),
                Self::DELIM => {
                    let before = rest[..i].chars().next_back();
                    let after = rest[i + 1..].chars().next();
                    if before.is_some_and(|c| !c.is_whitespace())
                        && !after.is_some_and(|c| c.is_ascii_digit())
                    {
                        return Ok((&rest[..i], i + 2));
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        Err(1 + b.len())
    }

    /// Whether `tex` can be written back as `$tex$`.
    pub fn can_render(tex: &str) -> bool {
        Self::parse(&format!("${tex}$")).is_some_and(|(t, _)| t == tex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_math() {
        assert_eq!(InlineMath::parse("$x^2$ and"), Some(("x^2", 5)));
        assert_eq!(InlineMath::parse(r"$a \$ b$"), Some((r"a \$ b", 8)));
    }

    #[test]
    fn leaves_prices_alone() {
        assert_eq!(InlineMath::parse("$5 and $6"), None);
        assert_eq!(InlineMath::parse("$ x$"), None);
        assert_eq!(InlineMath::parse("$$x$$"), None);
        assert_eq!(InlineMath::parse("$x"), None);
    }

    #[test]
    fn failed_scans_report_their_reach() {
        assert_eq!(InlineMath::scan("$a $b\nc$"), Err(5));
        assert_eq!(InlineMath::scan("$ x$"), Err(0));
    }

    #[test]
    fn renderable() {
        assert!(InlineMath::can_render("E=mc^2"));
        assert!(!InlineMath::can_render(" padded "));
    }
}
