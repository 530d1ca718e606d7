/// Language tag that marks a diagram block.
pub const DIAGRAM_TAG: &str = "mermaid";

/// Code-block hook that turns `mermaid` fences into a diagram container.
///
/// Every other block (including untagged ones) is left to the default renderer.
pub fn diagram_block(lang: Option<&str>, code: &str) -> Option<String> {
    (lang == Some(DIAGRAM_TAG))
        .then(|| format!("<pre class=\"mermaid\">{}</pre>", escape_angle_brackets(code)))
}

/// Escapes `<` and `>` and nothing else.
pub fn escape_angle_brackets(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
