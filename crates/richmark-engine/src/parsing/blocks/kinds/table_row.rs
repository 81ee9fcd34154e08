/// Column alignment from a table separator row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }

    pub fn from_attr(attr: Option<&str>) -> Self {
        match attr {
            Some("left") => Alignment::Left,
            Some("center") => Alignment::Center,
            Some("right") => Alignment::Right,
            _ => Alignment::None,
        }
    }

    /// Separator cell for this alignment.
    pub fn marker(self) -> &'static str {
        match self {
            Alignment::None => "---",
            Alignment::Left => ":---",
            Alignment::Center => ":---:",
            Alignment::Right => "---:",
        }
    }
}

/// Pipe-table row syntax.
pub struct TableRow;

impl TableRow {
    pub const PIPE: char = '|';

    /// Splits a row into trimmed cells. Outer pipes are optional; `\|` is a
    /// literal pipe and pipes inside code spans do not split.
    pub fn split(line: &str) -> Vec<String> {
        let t = line.trim();
        let t = t.strip_prefix(Self::PIPE).unwrap_or(t);
        let t = if t.ends_with(Self::PIPE) && !t.ends_with("\\|") {
            &t[..t.len() - 1]
        } else {
            t
        };

        let mut cells = vec![];
        let mut cell = String::new();
        let mut in_code = false;
        let mut chars = t.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' if chars.peek() == Some(&Self::PIPE) => {
                    cell.push('\\');
                    if let Some(p) = chars.next() {
                        cell.push(p);
                    }
                }
                '`' => {
                    in_code = !in_code;
                    cell.push(c);
                }
                Self::PIPE if !in_code => cells.push(std::mem::take(&mut cell)),
                _ => cell.push(c),
            }
        }
        cells.push(cell);
        cells.into_iter().map(|c| c.trim().to_string()).collect()
    }

    /// Parses a separator row such as `| :--- | :---: | ---: |`.
    pub fn separator(line: &str) -> Option<Vec<Alignment>> {
        if !line.contains(Self::PIPE) {
            return None;
        }
        Self::split(line)
            .iter()
            .map(|cell| {
                let left = cell.starts_with(':');
                let right = cell.ends_with(':');
                let dashes = cell.trim_start_matches(':').trim_end_matches(':');
                if dashes.is_empty() || !dashes.chars().all(|c| c == '-') {
                    return None;
                }
                Some(match (left, right) {
                    (true, true) => Alignment::Center,
                    (true, false) => Alignment::Left,
                    (false, true) => Alignment::Right,
                    (false, false) => Alignment::None,
                })
            })
            .collect()
    }

    pub fn looks_like_row(line: &str) -> bool {
        line.contains(Self::PIPE)
    }
}
