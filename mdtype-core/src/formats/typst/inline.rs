//! Inline (phrasing) content → Typst markup.
//!
//! Pure and stateless: the output only depends on the node.

use crate::ir::nodes::Node;

/// Translate a sequence of inline nodes.
pub fn translate_inlines(nodes: &[Node]) -> String {
    nodes.iter().map(translate_inline).collect()
}

/// Translate a single inline node.
///
/// Block kinds have no inline rendering and produce nothing; the block translator never
/// routes them here.
pub fn translate_inline(node: &Node) -> String {
    match node {
        Node::Text(text) => escape_text(text),
        Node::Emphasis(children) => format!("_{}_", translate_inlines(children)),
        Node::Strong(children) => format!("*{}*", translate_inlines(children)),
        Node::Strikethrough(children) => format!("#strike[{}]", translate_inlines(children)),
        Node::InlineCode(code) => format!("`{code}`"),
        Node::Link(link) => format!(
            "#link(\"{}\")[{}]",
            escape_string(&link.url),
            translate_inlines(&link.children)
        ),
        Node::Image(image) => format!(
            "#figure(\n  image(\"{}\"),\n  caption: [{}]\n)\n\n",
            escape_string(&image.url),
            escape_text(&image.alt)
        ),
        Node::InlineMath(math) => format!("${math}$"),
        Node::LineBreak => " \\\n".to_string(),
        // Raw HTML has no safe general translation.
        Node::Raw(_) => String::new(),
        Node::Document(_)
        | Node::Heading(_)
        | Node::Paragraph(_)
        | Node::CodeBlock(_)
        | Node::List(_)
        | Node::ListItem(_)
        | Node::BlockQuote(_)
        | Node::Table(_)
        | Node::TableRow(_)
        | Node::TableCell(_)
        | Node::ThematicBreak
        | Node::BlockMath(_)
        | Node::FrontMatter(_) => String::new(),
    }
}

/// Escape the characters that start math mode (`$`) and references (`@`).
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '@') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Escape a value placed inside a Typst string literal.
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
