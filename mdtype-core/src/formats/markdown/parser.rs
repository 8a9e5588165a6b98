//! Markdown parsing (Markdown → document tree)
//!
//! Pipeline: Markdown string → Comrak AST → document tree + frontmatter text + diagram blocks

use crate::diagram::{DiagramBlock, DIAGRAM_LANGUAGE};
use crate::error::ConvertError;
use crate::ir::nodes::{CodeBlock, Document, Heading, Image, Link, List, Node};
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document, Arena, Options};

/// The result of parsing a Markdown source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMarkdown {
    pub document: Document,
    /// Raw frontmatter text (YAML), when present.
    pub frontmatter: Option<String>,
    /// Diagram blocks in document order.
    pub diagrams: Vec<DiagramBlock>,
}

/// Parse a Markdown string into a document tree.
pub fn parse_markdown(source: &str) -> Result<ParsedMarkdown, ConvertError> {
    let arena = Arena::new();
    let options = default_comrak_options();
    let root = parse_document(&arena, source, &options);

    // comrak 0.29 always returns a document root. This is the only parser failure the
    // adapter can observe, and it is reported as `ParseError`.
    if !matches!(root.data.borrow().value, NodeValue::Document) {
        return Err(ConvertError::ParseError(
            "Markdown parser did not produce a document root".to_string(),
        ));
    }

    let children = root.children().filter_map(convert_node).collect();
    let document = Document::new(children);
    let frontmatter = document.frontmatter().map(str::to_string);
    let diagrams = collect_diagrams(&document);

    Ok(ParsedMarkdown {
        document,
        frontmatter,
        diagrams,
    })
}

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.math_dollars = true;
    options.extension.front_matter_delimiter = Some("---".to_string());
    options
}

/// Convert one Comrak node (and its subtree) into a document tree node.
fn convert_node<'a>(node: &'a AstNode<'a>) -> Option<Node> {
    let data = node.data.borrow();

    let converted = match &data.value {
        NodeValue::Document => Node::Document(Document::new(convert_children(node))),

        NodeValue::FrontMatter(content) => Node::FrontMatter(strip_frontmatter_delimiters(content)),

        NodeValue::Heading(heading) => Node::Heading(Heading {
            depth: heading.level,
            children: convert_children(node),
        }),

        NodeValue::Paragraph => {
            let children = convert_children(node);
            match display_math_only(&children) {
                Some(math) => Node::BlockMath(math),
                None => Node::Paragraph(children.into_iter().map(inline_math).collect()),
            }
        }

        NodeValue::Text(text) => Node::Text(text.clone()),
        NodeValue::SoftBreak => Node::Text("\n".to_string()),
        NodeValue::LineBreak => Node::LineBreak,
        NodeValue::Emph => Node::Emphasis(convert_children(node)),
        NodeValue::Strong => Node::Strong(convert_children(node)),
        NodeValue::Strikethrough => Node::Strikethrough(convert_children(node)),
        NodeValue::Code(code) => Node::InlineCode(code.literal.clone()),

        NodeValue::CodeBlock(code_block) => Node::CodeBlock(CodeBlock {
            language: code_block
                .info
                .split_whitespace()
                .next()
                .map(str::to_string),
            value: strip_trailing_newline(&code_block.literal),
        }),

        NodeValue::Link(link) => Node::Link(Link {
            url: link.url.clone(),
            children: convert_children(node),
        }),

        NodeValue::Image(link) => Node::Image(Image {
            url: link.url.clone(),
            alt: collect_text_from_children(node),
        }),

        NodeValue::List(list) => Node::List(List {
            ordered: matches!(list.list_type, ListType::Ordered),
            items: convert_children(node),
        }),

        NodeValue::Item(_) => Node::ListItem(convert_children(node)),
        NodeValue::BlockQuote => Node::BlockQuote(convert_children(node)),
        NodeValue::Table(_) => Node::Table(convert_children(node)),
        NodeValue::TableRow(_) => Node::TableRow(convert_children(node)),
        NodeValue::TableCell => Node::TableCell(convert_children(node)),
        NodeValue::ThematicBreak => Node::ThematicBreak,
        NodeValue::HtmlBlock(html) => Node::Raw(html.literal.clone()),
        NodeValue::HtmlInline(html) => Node::Raw(html.clone()),

        NodeValue::Math(math) => {
            if math.display_math {
                Node::BlockMath(math.literal.clone())
            } else {
                Node::InlineMath(math.literal.clone())
            }
        }

        _ => {
            // No counterpart in the document tree
            return None;
        }
    };

    Some(converted)
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    node.children().filter_map(convert_node).collect()
}

/// A paragraph made of a single display-math span (plus whitespace) is block math.
fn display_math_only(children: &[Node]) -> Option<String> {
    let mut math = None;
    for child in children {
        match child {
            Node::BlockMath(literal) if math.is_none() => math = Some(literal.clone()),
            Node::Text(text) if text.trim().is_empty() => {}
            _ => return None,
        }
    }
    math
}

/// Display math mixed with other phrasing content stays inline.
fn inline_math(node: Node) -> Node {
    match node {
        Node::BlockMath(literal) => Node::InlineMath(literal),
        other => other,
    }
}

fn strip_frontmatter_delimiters(content: &str) -> String {
    content
        .trim()
        .trim_start_matches("---")
        .trim_end_matches("---")
        .trim()
        .to_string()
}

fn strip_trailing_newline(literal: &str) -> String {
    literal
        .strip_suffix('\n')
        .unwrap_or(literal)
        .to_string()
}

/// Collect text content from a node (used for image alt text)
fn collect_text_content<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => output.push(' '),
        _ => {
            for child in node.children() {
                collect_text_content(child, output);
            }
        }
    }
}

fn collect_text_from_children<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        collect_text_content(child, &mut text);
    }
    text
}

/// Walk the tree depth-first and number every diagram block in document order.
fn collect_diagrams(document: &Document) -> Vec<DiagramBlock> {
    fn walk(nodes: &[Node], out: &mut Vec<DiagramBlock>) {
        for node in nodes {
            if let Node::CodeBlock(code) = node {
                if code.language.as_deref() == Some(DIAGRAM_LANGUAGE) {
                    out.push(DiagramBlock::new(out.len(), code.value.clone()));
                }
            }
            walk(node.children(), out);
        }
    }

    let mut blocks = Vec::new();
    walk(&document.children, &mut blocks);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_paragraph() {
        let parsed = parse_markdown("This is a simple paragraph.\n").unwrap();
        assert_eq!(
            parsed.document.children,
            vec![Node::paragraph("This is a simple paragraph.")]
        );
        assert!(parsed.frontmatter.is_none());
    }

    #[test]
    fn test_empty_input_is_an_empty_document() {
        let parsed = parse_markdown("").expect("empty input parses");
        assert!(parsed.document.children.is_empty());
        assert!(parsed.frontmatter.is_none());
        assert!(parsed.diagrams.is_empty());
    }

    #[test]
    fn test_heading_depth() {
        let parsed = parse_markdown("### Deep\n").unwrap();
        assert_eq!(parsed.document.children, vec![Node::heading(3, "Deep")]);
    }

    #[test]
    fn test_code_block_drops_trailing_newline() {
        let parsed = parse_markdown("```rust\nfn main() {}\n```\n").unwrap();
        assert_eq!(
            parsed.document.children,
            vec![Node::code_block(Some("rust"), "fn main() {}")]
        );
    }

    #[test]
    fn test_frontmatter_is_extracted() {
        let md = "---\ntitle: Report\n---\n\nBody.\n";
        let parsed = parse_markdown(md).unwrap();
        assert_eq!(parsed.frontmatter.as_deref(), Some("title: Report"));
        assert!(matches!(parsed.document.children[0], Node::FrontMatter(_)));
    }

    #[test]
    fn test_diagrams_are_numbered_in_document_order() {
        let md = "```mermaid\ngraph TD; A-->B\n```\n\n- item\n\n  ```mermaid\n  sequenceDiagram\n  ```\n";
        let parsed = parse_markdown(md).unwrap();
        let ids: Vec<_> = parsed.diagrams.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["diagram-0", "diagram-1"]);
        assert_eq!(parsed.diagrams[0].source, "graph TD; A-->B");
    }

    #[test]
    fn test_table_structure() {
        let parsed = parse_markdown("|A|B|\n|-|-|\n|1|2|\n").unwrap();
        match &parsed.document.children[0] {
            Node::Table(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0].children().len(), 2);
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_math_and_soft_break() {
        let parsed = parse_markdown("Euler $e^{i\\pi}$\nnext line\n").unwrap();
        let Node::Paragraph(children) = &parsed.document.children[0] else {
            panic!("expected paragraph");
        };
        assert!(children.contains(&Node::InlineMath("e^{i\\pi}".to_string())));
        assert!(children.contains(&Node::text("\n")));
    }

    #[test]
    fn test_html_block_is_raw() {
        let parsed = parse_markdown("<!-- toc -->\n").unwrap();
        assert!(parsed.document.children[0].is_raw_marker("<!-- toc -->"));
    }
}
