// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **some** content and a [link](https://example.com).\n\n- Bullet point\n  - Nested item\n- Another item\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_rich_markdown(sections: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        content.push_str(&format!("## Section {section}\n\n"));
        content.push_str(&format!(
            "Dear `${{placeholder:name}},value:User {section}`, see note[^{section}] and $x_{section}$.\n\n"
        ));
        content.push_str("| key | value |\n| :--- | ---: |\n| a | 1 |\n| b | 2 |\n\n");
        content.push_str("> quoted *text* with ~~strike~~\n\n![clip](movie.mp4)\n\n");
    }
    content.push_str("## Footnotes\n\n");
    for section in 0..sections {
        content.push_str(&format!("[^{section}]: https://example.com/{section} Source {section}\n"));
    }
    content
}
