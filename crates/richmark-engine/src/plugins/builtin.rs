//! Converters every registry carries after the host plugins.

use crate::{
    parsing::blocks::kinds::{CodeFence, FenceKind},
    serialize::{
        escape::escape_label,
        inline::{image_markdown, link_markdown},
    },
    tree::{Node, NodeKind, NodeRef},
};

use super::descriptor::{ConvertError, ParseConverter, Selector, SerializeConverter};

pub const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "webm", "mov", "m4v", "ogv"];
pub const ATTACHMENT_EXTENSIONS: [&str; 11] = [
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar", "7z", "csv",
];

/// Language of fenced code blocks that hold display math.
pub const MATH_FENCE: &str = "math";

/// Lower-cased file extension of a URL path, ignoring query and fragment.
pub fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let file = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = file.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

fn has_extension(url: Option<&str>, allowed: &[&str]) -> bool {
    url.and_then(extension)
        .is_some_and(|ext| allowed.contains(&ext.as_str()))
}

fn copy_attrs(node: NodeRef<'_>, into: Node, keys: &[&str]) -> Node {
    keys.iter().fold(into, |n, key| match node.attr(key) {
        Some(v) => n.with_attr(*key, v),
        None => n,
    })
}

pub fn parse_converters() -> Vec<ParseConverter> {
    vec![
        ParseConverter::new(
            "video",
            Selector::predicate(|n| {
                *n.kind() == NodeKind::Image && has_extension(n.attr("src"), &VIDEO_EXTENSIONS)
            }),
            |n| Ok(copy_attrs(n, Node::new(NodeKind::Video), &["src", "alt", "title"])),
        ),
        ParseConverter::new(
            "attachment",
            Selector::predicate(|n| {
                *n.kind() == NodeKind::Link
                    && !n.node().flag("autolink")
                    && has_extension(n.attr("href"), &ATTACHMENT_EXTENSIONS)
            }),
            |n| {
                let src = n
                    .attr("href")
                    .ok_or_else(|| ConvertError::new("link has no href"))?;
                Ok(copy_attrs(
                    n,
                    Node::new(NodeKind::Attachment)
                        .with_attr("src", src)
                        .with_attr("name", n.text_content()),
                    &["title"],
                ))
            },
        ),
        ParseConverter::new("math-fence", Selector::Fence(MATH_FENCE.into()), |n| {
            Ok(Node::new(NodeKind::MathBlock)
                .with_attr("syntax", "fence")
                .with_text(n.text()))
        }),
    ]
}

pub fn serialize_converters() -> Vec<SerializeConverter> {
    vec![
        SerializeConverter::new("video", Selector::Kind(NodeKind::Video), |n| {
            let src = n
                .attr("src")
                .ok_or_else(|| ConvertError::new("video has no src"))?;
            Ok(image_markdown(n.attr("alt").unwrap_or_default(), src, n.attr("title")))
        }),
        SerializeConverter::new("attachment", Selector::Kind(NodeKind::Attachment), |n| {
            let src = n
                .attr("src")
                .ok_or_else(|| ConvertError::new("attachment has no src"))?;
            Ok(link_markdown(
                &escape_label(n.attr("name").unwrap_or_default()),
                src,
                n.attr("title"),
            ))
        }),
        SerializeConverter::new(
            "math-fence",
            Selector::predicate(|n| {
                *n.kind() == NodeKind::MathBlock && n.attr("syntax") == Some("fence")
            }),
            |n| {
                let fence = CodeFence::delimiter_for(FenceKind::Backticks, n.text());
                Ok(format!("{fence}{MATH_FENCE}\n{}\n{fence}", n.text()))
            },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("clip.MP4", Some("mp4"))]
    #[case("https://x.y/a/report.pdf?dl=1#p2", Some("pdf"))]
    #[case("https://x.y/a.dir/readme", None)]
    #[case(".hidden", None)]
    #[case("noext", None)]
    fn extensions(#[case] url: &str, #[case] expected: Option<&str>) {
        assert_eq!(extension(url).as_deref(), expected);
    }
}
