/// YAML front-matter fence, only meaningful on the very first line.
pub struct FrontMatter;

impl FrontMatter {
    pub const DELIM: &'static str = "---";
    pub const ALT_CLOSE: &'static str = "...";

    pub fn opens(line: &str) -> bool {
        line.trim_end() == Self::DELIM
    }

    pub fn closes(line: &str) -> bool {
        let t = line.trim_end();
        t == Self::DELIM || t == Self::ALT_CLOSE
    }
}
